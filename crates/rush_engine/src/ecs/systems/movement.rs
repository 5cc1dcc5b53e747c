//! Movement integration system

use crate::ecs::components::MovementComponent;
use crate::ecs::{Entity, System, World};

/// Applies every [`MovementComponent`] to its entity's local transform
///
/// Once halted the system stays halted; this is how a finished round freezes
/// the scene while rendering continues.
#[derive(Debug, Default)]
pub struct MovementSystem {
    halted: bool,
}

impl MovementSystem {
    /// Create a running movement system
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop all movement for the rest of the run
    pub fn halt(&mut self) {
        if !self.halted {
            log::info!("Movement halted");
        }
        self.halted = true;
    }

    /// Whether [`MovementSystem::halt`] has been called
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl System for MovementSystem {
    fn update(&mut self, world: &mut World, delta_time: f32) {
        if self.halted {
            return;
        }

        let movers: Vec<(Entity, MovementComponent)> = world
            .query::<MovementComponent>()
            .map(|(entity, movement)| (entity, *movement))
            .collect();

        for (entity, movement) in movers {
            if let Some(transform) = world.transform_mut(entity) {
                movement.integrate(transform, delta_time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_moves_only_entities_with_movement() {
        let mut world = World::new();
        let runner = world.create_entity("runner");
        let rock = world.create_entity("rock");
        world
            .add_component(runner, MovementComponent::new(Vec3::new(0.0, 0.0, -2.0), Vec3::zeros()))
            .unwrap();

        let mut system = MovementSystem::new();
        system.update(&mut world, 1.5);

        assert_relative_eq!(world.transform(runner).unwrap().position, Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(world.transform(rock).unwrap().position, Vec3::zeros());
    }

    #[test]
    fn test_halt_is_permanent() {
        let mut world = World::new();
        let runner = world.create_entity("runner");
        world
            .add_component(runner, MovementComponent::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros()))
            .unwrap();

        let mut system = MovementSystem::new();
        system.halt();
        system.update(&mut world, 1.0);
        system.update(&mut world, 1.0);

        assert!(system.is_halted());
        assert_relative_eq!(world.transform(runner).unwrap().position, Vec3::zeros());
    }
}
