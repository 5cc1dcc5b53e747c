//! Obstacle collision queries

use crate::ecs::components::{ColliderComponent, ColliderRole};
use crate::ecs::World;
use crate::foundation::math::{Mat4Ext, Vec3};
use crate::physics::collision::BoundingSphere;

/// Registered sphere obstacles
///
/// Obstacles are captured once, at registration time, in world space. Every
/// registered obstacle takes part in each query.
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<BoundingSphere>,
}

impl ObstacleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every obstacle collider currently in the world
    pub fn from_world(world: &World) -> Self {
        let mut registry = Self::new();
        for (entity, collider) in world.query::<ColliderComponent>() {
            if collider.role != ColliderRole::Obstacle {
                continue;
            }
            if let Some(matrix) = world.local_to_world_matrix(entity) {
                registry.register(collider.sphere_at(matrix.transform_point4(&Vec3::zeros())));
            }
        }
        log::debug!("Registered {} obstacles", registry.len());
        registry
    }

    /// Register one obstacle
    pub fn register(&mut self, obstacle: BoundingSphere) {
        self.obstacles.push(obstacle);
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether no obstacle is registered
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// All registered obstacles
    pub fn obstacles(&self) -> &[BoundingSphere] {
        &self.obstacles
    }

    /// True when a sphere at `position` touches any obstacle
    pub fn is_collision(&self, radius: f32, position: Vec3) -> bool {
        let probe = BoundingSphere::new(position, radius);
        self.obstacles.iter().any(|obstacle| obstacle.intersects(&probe))
    }

    /// Remove every obstacle
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_only_obstacles_in_world_space() {
        let mut world = World::new();
        let track = world.create_entity("track");
        world.transform_mut(track).unwrap().position = Vec3::new(0.0, 0.0, -10.0);

        let rock = world.create_entity("rock");
        world.set_parent(rock, Some(track)).unwrap();
        world.transform_mut(rock).unwrap().position = Vec3::new(2.0, 0.0, 0.0);
        world.add_component(rock, ColliderComponent::obstacle(1.0)).unwrap();

        let player = world.create_entity("player");
        world.add_component(player, ColliderComponent::player(0.5)).unwrap();

        let registry = ObstacleRegistry::from_world(&world);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.obstacles()[0].center, Vec3::new(2.0, 0.0, -10.0));
    }

    #[test]
    fn test_every_obstacle_is_checked() {
        let mut registry = ObstacleRegistry::new();
        for index in 0..20_u8 {
            let z = -f32::from(index) * 5.0;
            registry.register(BoundingSphere::new(Vec3::new(0.0, 0.0, z), 1.0));
        }

        // Beyond any fixed small count
        assert!(registry.is_collision(0.5, Vec3::new(0.0, 0.0, -95.0)));
        assert!(registry.is_collision(0.5, Vec3::new(1.5, 0.0, 0.0)));
        assert!(!registry.is_collision(0.5, Vec3::new(0.0, 0.0, -97.5)));
    }
}
