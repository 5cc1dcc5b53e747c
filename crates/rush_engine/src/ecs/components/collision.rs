//! Collision components for ECS

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;
use crate::physics::collision::BoundingSphere;

/// What a collider stands for in the game rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderRole {
    /// The controlled body that must avoid obstacles
    Player,
    /// Static hazard
    #[default]
    Obstacle,
}

/// Sphere collider attached to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderComponent {
    /// Sphere radius in world units
    pub radius: f32,

    /// Role in the collision rules
    pub role: ColliderRole,
}

impl Component for ColliderComponent {}

impl ColliderComponent {
    /// Player collider
    pub fn player(radius: f32) -> Self {
        Self { radius, role: ColliderRole::Player }
    }

    /// Obstacle collider
    pub fn obstacle(radius: f32) -> Self {
        Self { radius, role: ColliderRole::Obstacle }
    }

    /// Bounding sphere placed at a world-space center
    pub fn sphere_at(&self, center: Vec3) -> BoundingSphere {
        BoundingSphere::new(center, self.radius)
    }
}
