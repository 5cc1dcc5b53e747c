//! Per-frame render and light command queues

use crate::assets::{MaterialHandle, MeshHandle};
use crate::core::config::TransparentSort;
use crate::ecs::components::LightComponent;
use crate::ecs::Entity;
use crate::foundation::math::{Mat4, Vec3};

/// One draw extracted from the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    /// Source entity
    pub entity: Entity,
    /// Composed world matrix of the entity
    pub local_to_world: Mat4,
    /// World-space position of the local origin
    pub center: Vec3,
    /// Geometry
    pub mesh: MeshHandle,
    /// Shading state
    pub material: MaterialHandle,
}

/// One light extracted from the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCommand {
    /// Source entity
    pub entity: Entity,
    /// Composed world matrix of the entity
    pub local_to_world: Mat4,
    /// Light parameters copied for this frame
    pub light: LightComponent,
}

/// Render queue split into opaque and transparent commands, plus lights
///
/// Rebuilt every frame. The vectors are cleared, not freed, between frames.
#[derive(Debug, Default)]
pub struct RenderQueue {
    opaque: Vec<RenderCommand>,
    transparent: Vec<RenderCommand>,
    lights: Vec<LightCommand>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every command, keeping allocations
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
        self.lights.clear();
    }

    /// Queue a draw in the list matching its transparency
    pub fn push(&mut self, command: RenderCommand, transparent: bool) {
        if transparent {
            self.transparent.push(command);
        } else {
            self.opaque.push(command);
        }
    }

    /// Queue a light
    pub fn push_light(&mut self, command: LightCommand) {
        self.lights.push(command);
    }

    /// Opaque draws in extraction order
    pub fn opaque(&self) -> &[RenderCommand] {
        &self.opaque
    }

    /// Transparent draws, sorted once [`RenderQueue::sort_transparent`] has run
    pub fn transparent(&self) -> &[RenderCommand] {
        &self.transparent
    }

    /// Lights in extraction order
    pub fn lights(&self) -> &[LightCommand] {
        &self.lights
    }

    /// Order transparent draws along the camera forward axis
    pub fn sort_transparent(&mut self, forward: &Vec3, rule: TransparentSort) {
        sort_transparent(&mut self.transparent, forward, rule);
    }
}

/// Sort transparent commands by the projection of their centers on `forward`
///
/// With [`TransparentSort::ViewAxisAscending`], A precedes B exactly when
/// `(B.center - A.center) . forward > 0`. The sort is stable, so commands with
/// equal projections keep extraction order.
pub fn sort_transparent(commands: &mut [RenderCommand], forward: &Vec3, rule: TransparentSort) {
    commands.sort_by(|a, b| {
        let along_a = a.center.dot(forward);
        let along_b = b.center.dot(forward);
        let ascending = along_a.total_cmp(&along_b);
        match rule {
            TransparentSort::ViewAxisAscending => ascending,
            TransparentSort::ViewAxisDescending => ascending.reverse(),
        }
    });
}

/// Whether `first` may precede `second` under the ascending rule
pub fn precedes(first: &RenderCommand, second: &RenderCommand, forward: &Vec3) -> bool {
    (second.center - first.center).dot(forward) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::{DefaultKey, TypedHandle};
    use slotmap::SlotMap;

    fn command_at(entity: Entity, center: Vec3) -> RenderCommand {
        RenderCommand {
            entity,
            local_to_world: Mat4::new_translation(&center),
            center,
            mesh: TypedHandle::new(DefaultKey::default()),
            material: TypedHandle::new(DefaultKey::default()),
        }
    }

    fn entities(count: usize) -> Vec<Entity> {
        let mut keys: SlotMap<Entity, ()> = SlotMap::with_key();
        (0..count).map(|_| keys.insert(())).collect()
    }

    #[test]
    fn test_partition_keeps_lists_separate() {
        let ids = entities(5);
        let mut queue = RenderQueue::new();
        let pattern = [false, true, false, true, false];
        for (&entity, &transparent) in ids.iter().zip(&pattern) {
            queue.push(command_at(entity, Vec3::zeros()), transparent);
        }

        let opaque: Vec<Entity> = queue.opaque().iter().map(|c| c.entity).collect();
        let transparent: Vec<Entity> = queue.transparent().iter().map(|c| c.entity).collect();
        assert_eq!(opaque, vec![ids[0], ids[2], ids[4]]);
        assert_eq!(transparent, vec![ids[1], ids[3]]);

        queue.clear();
        assert!(queue.opaque().is_empty() && queue.transparent().is_empty());
    }

    #[test]
    fn test_ascending_rule_along_negative_z() {
        let ids = entities(3);
        let mut commands = vec![
            command_at(ids[0], Vec3::new(0.0, 0.0, -5.0)),
            command_at(ids[1], Vec3::new(0.0, 0.0, -1.0)),
            command_at(ids[2], Vec3::new(0.0, 0.0, -10.0)),
        ];
        let forward = Vec3::new(0.0, 0.0, -1.0);

        sort_transparent(&mut commands, &forward, TransparentSort::ViewAxisAscending);

        let order: Vec<f32> = commands.iter().map(|c| c.center.z).collect();
        assert_eq!(order, vec![-1.0, -5.0, -10.0]);
        for pair in commands.windows(2) {
            assert!(precedes(&pair[0], &pair[1], &forward));
        }
    }

    #[test]
    fn test_descending_rule_reverses() {
        let ids = entities(3);
        let mut commands = vec![
            command_at(ids[0], Vec3::new(0.0, 0.0, -5.0)),
            command_at(ids[1], Vec3::new(0.0, 0.0, -1.0)),
            command_at(ids[2], Vec3::new(0.0, 0.0, -10.0)),
        ];

        sort_transparent(&mut commands, &Vec3::new(0.0, 0.0, -1.0), TransparentSort::ViewAxisDescending);

        let order: Vec<f32> = commands.iter().map(|c| c.center.z).collect();
        assert_eq!(order, vec![-10.0, -5.0, -1.0]);
    }

    #[test]
    fn test_off_axis_centers_use_projection_only() {
        let ids = entities(3);
        // Camera looks down +X; lateral offsets must not affect the order
        let mut commands = vec![
            command_at(ids[0], Vec3::new(4.0, 100.0, 0.0)),
            command_at(ids[1], Vec3::new(1.0, -50.0, 3.0)),
            command_at(ids[2], Vec3::new(4.0, 0.0, 0.0)),
        ];

        sort_transparent(&mut commands, &Vec3::x(), TransparentSort::ViewAxisAscending);

        // Equal projections keep extraction order
        let order: Vec<Entity> = commands.iter().map(|c| c.entity).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
    }
}
