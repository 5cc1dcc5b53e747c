//! Collision primitives

use crate::foundation::math::Vec3;

/// Bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center in world space
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a new bounding sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Spheres touch or overlap (distance <= sum of radii)
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Point lies inside or on the sphere
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }
}
