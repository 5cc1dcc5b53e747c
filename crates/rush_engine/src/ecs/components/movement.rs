//! Movement component for ECS

use crate::ecs::Component;
use crate::ecs::components::TransformComponent;
use crate::foundation::math::Vec3;

/// Constant velocity motion applied to the entity's local transform
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementComponent {
    /// Units per second
    pub linear_velocity: Vec3,

    /// Euler radians per second (pitch, yaw, roll)
    pub angular_velocity: Vec3,
}

impl Component for MovementComponent {}

impl MovementComponent {
    /// Create a movement component
    pub fn new(linear_velocity: Vec3, angular_velocity: Vec3) -> Self {
        Self {
            linear_velocity,
            angular_velocity,
        }
    }

    /// Advance the transform by one step of `delta_time` seconds
    pub fn integrate(&self, transform: &mut TransformComponent, delta_time: f32) {
        transform.translate(self.linear_velocity * delta_time);
        transform.rotate(self.angular_velocity * delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate() {
        let movement = MovementComponent::new(Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 1.0, 0.0));
        let mut transform = TransformComponent::identity();

        movement.integrate(&mut transform, 0.5);
        movement.integrate(&mut transform, 0.25);

        assert_relative_eq!(transform.position, Vec3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(transform.rotation, Vec3::new(0.0, 0.75, 0.0));
    }
}
