//! Transform component for ECS

use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Transform component representing position, rotation, and scale
///
/// Rotation is stored as Euler angles in radians: `x` is pitch, `y` is yaw and
/// `z` is roll. The matrix is rebuilt from the fields on every call to
/// [`TransformComponent::to_matrix`]; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponent {
    /// Position in 3D space
    pub position: Vec3,

    /// Euler rotation in radians (pitch, yaw, roll)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformComponent {
    /// Create a new transform component
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Create a transform from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation in radians
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set rotation from degrees
    pub fn with_rotation_degrees(mut self, degrees: Vec3) -> Self {
        self.rotation = utils::deg_to_rad_vec3(degrees);
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Local matrix: `Translation * Ry(yaw) * Rx(pitch) * Rz(roll) * Scale`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Translate by offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Add to the Euler angles (radians)
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// Local +X axis expressed in the parent space
    pub fn right(&self) -> Vec3 {
        self.to_matrix().transform_direction4(&Vec3::x()).normalize()
    }

    /// Local -Z axis expressed in the parent space
    pub fn forward(&self) -> Vec3 {
        self.to_matrix().transform_direction4(&-Vec3::z()).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_identity() {
        let transform = TransformComponent::identity();

        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.rotation, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_origin_maps_to_position() {
        let transform = TransformComponent::new(
            Vec3::new(3.0, -2.0, 7.5),
            Vec3::new(0.3, 1.2, -0.7),
            Vec3::new(2.0, 0.5, 4.0),
        );

        let origin = transform.to_matrix().transform_point4(&Vec3::zeros());
        assert_relative_eq!(origin, transform.position, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_order_is_yaw_pitch_roll() {
        // pitch then yaw: +Y -> +Z -> +X
        let transform = TransformComponent::identity().with_rotation(Vec3::new(HALF_PI, HALF_PI, 0.0));
        let direction = transform.to_matrix().transform_direction4(&Vec3::y());
        assert_relative_eq!(direction, Vec3::x(), epsilon = EPSILON);

        let degrees = TransformComponent::identity().with_rotation_degrees(Vec3::new(90.0, 90.0, 0.0));
        assert_relative_eq!(degrees.to_matrix(), transform.to_matrix(), epsilon = EPSILON);
    }

    #[test]
    fn test_scale_applied_before_rotation() {
        let transform = TransformComponent::identity()
            .with_rotation(Vec3::new(0.0, HALF_PI, 0.0))
            .with_scale(Vec3::new(2.0, 1.0, 1.0));

        // Local X is stretched first, then yawed onto -Z
        let direction = transform.to_matrix().transform_direction4(&Vec3::x());
        assert_relative_eq!(direction, Vec3::new(0.0, 0.0, -2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_tracks_mutation() {
        let mut transform = TransformComponent::from_position(Vec3::new(1.0, 0.0, 0.0));
        let before = transform.to_matrix();

        transform.translate(Vec3::new(0.0, 0.0, -4.0));
        let after = transform.to_matrix();

        assert_ne!(before, after);
        assert_relative_eq!(after.transform_point4(&Vec3::zeros()), Vec3::new(1.0, 0.0, -4.0));
    }

    #[test]
    fn test_axes() {
        let transform = TransformComponent::identity().with_rotation(Vec3::new(0.0, HALF_PI, 0.0));

        assert_relative_eq!(transform.right(), -Vec3::z(), epsilon = EPSILON);
        assert_relative_eq!(transform.forward(), -Vec3::x(), epsilon = EPSILON);
    }
}
