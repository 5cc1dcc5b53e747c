//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics. All matrices follow the
//! OpenGL conventions: right-handed view space, camera looking down -Z,
//! clip space depth in [-1, 1].

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 2D integer vector, used for viewport origins and sizes in pixels
pub type IVec2 = Vector2<i32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Convert every component of a vector from degrees to radians
    pub fn deg_to_rad_vec3(degrees: Vec3) -> Vec3 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert every component of a vector from degrees to radians
    pub fn deg_to_rad_vec2(degrees: Vec2) -> Vec2 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a rotation from Euler angles applied as `Ry(yaw) * Rx(pitch) * Rz(roll)`
    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4;

    /// Create a symmetric perspective projection matrix (OpenGL clip space)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix for the given box (OpenGL clip space)
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: &Point3, target: &Point3, up: &Vec3) -> Mat4;

    /// Apply this matrix to `(p, 1)` and return the xyz part
    fn transform_point4(&self, point: &Vec3) -> Vec3;

    /// Apply this matrix to `(v, 0)` and return the xyz part
    fn transform_direction4(&self, vector: &Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4 {
        Self::rotation_y(yaw) * Self::rotation_x(pitch) * Self::rotation_z(roll)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // nalgebra takes the aspect first; the result matches the classic gluPerspective layout
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_orthographic(left, right, bottom, top, near, far)
    }

    fn look_at(eye: &Point3, target: &Point3, up: &Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, target, up)
    }

    fn transform_point4(&self, point: &Vec3) -> Vec3 {
        (self * Vec4::new(point.x, point.y, point.z, 1.0)).xyz()
    }

    fn transform_direction4(&self, vector: &Vec3) -> Vec3 {
        (self * Vec4::new(vector.x, vector.y, vector.z, 0.0)).xyz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_yaw_pitch_roll_order() {
        let half_pi = constants::HALF_PI;

        // Yaw alone turns +X into -Z
        let yaw = Mat4::yaw_pitch_roll(half_pi, 0.0, 0.0);
        assert_relative_eq!(yaw.transform_direction4(&Vec3::x()), -Vec3::z(), epsilon = EPSILON);

        // Pitch is applied before yaw: +Y -> +Z (pitch) -> +X (yaw)
        let pitch_yaw = Mat4::yaw_pitch_roll(half_pi, half_pi, 0.0);
        assert_relative_eq!(pitch_yaw.transform_direction4(&Vec3::y()), Vec3::x(), epsilon = EPSILON);

        // Roll is applied first of all: +X -> +Y (roll) -> +Z (pitch)
        let roll_pitch = Mat4::yaw_pitch_roll(0.0, half_pi, half_pi);
        assert_relative_eq!(roll_pitch.transform_direction4(&Vec3::x()), Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_point_and_direction_helpers() {
        let translation = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));

        assert_relative_eq!(translation.transform_point4(&Vec3::zeros()), Vec3::new(1.0, 2.0, 3.0));
        // Directions ignore translation
        assert_relative_eq!(translation.transform_direction4(&Vec3::y()), Vec3::y());
    }

    #[test]
    fn test_canonical_look_at_is_identity() {
        let view = Mat4::look_at(&Point3::origin(), &Point3::new(0.0, 0.0, -1.0), &Vec3::y());
        assert_relative_eq!(view, Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_layout() {
        let fov = utils::deg_to_rad(90.0);
        let projection = Mat4::perspective(fov, 2.0, 0.1, 100.0);

        // tan(45deg) == 1, so the diagonal holds 1/aspect and 1
        assert_relative_eq!(projection[(0, 0)], 0.5, epsilon = EPSILON);
        assert_relative_eq!(projection[(1, 1)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(projection[(3, 2)], -1.0, epsilon = EPSILON);
    }
}
