//! # Camera Component
//!
//! A camera attached to an entity. The entity's world transform positions and
//! orients the camera: it looks down local -Z with local +Y as up.
//!
//! ## Coordinate System
//! Right-handed, Y-up view space with OpenGL clip conventions:
//! - X+ = Right
//! - Y+ = Up
//! - Z- = Forward (away from the viewer)
//!
//! Matrices are recomputed on every call. The viewport can change size between
//! frames, so nothing here caches an aspect ratio.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::{utils, IVec2, Mat4, Mat4Ext, Point3, Vec3};

/// Projection model of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraType {
    /// Symmetric perspective frustum driven by `fov_y`
    #[default]
    Perspective,
    /// Symmetric box driven by `ortho_height`
    Orthographic,
}

/// Camera parameters for an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    /// Projection model
    pub camera_type: CameraType,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    /// Vertical field of view in radians (perspective only)
    pub fov_y: f32,

    /// Full vertical extent of the view box (orthographic only)
    pub ortho_height: f32,
}

impl Component for CameraComponent {}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            camera_type: CameraType::Perspective,
            near: 0.01,
            far: 100.0,
            fov_y: utils::deg_to_rad(90.0),
            ortho_height: 1.0,
        }
    }
}

impl CameraComponent {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            camera_type: CameraType::Perspective,
            near,
            far,
            fov_y,
            ..Self::default()
        }
    }

    /// Create an orthographic camera showing `ortho_height` world units vertically
    pub fn orthographic(ortho_height: f32, near: f32, far: f32) -> Self {
        Self {
            camera_type: CameraType::Orthographic,
            near,
            far,
            ortho_height,
            ..Self::default()
        }
    }

    /// View matrix for a camera whose entity has the given local-to-world matrix
    ///
    /// Builds a right-handed look-at from three world-space quantities:
    /// - eye: `M * (0, 0, 0, 1)`
    /// - center: `M * (0, 0, -1, 1)`
    /// - up: `M * (0, 1, 0, 0)`
    pub fn view_matrix(&self, local_to_world: &Mat4) -> Mat4 {
        let eye = local_to_world.transform_point4(&Vec3::zeros());
        let center = local_to_world.transform_point4(&Vec3::new(0.0, 0.0, -1.0));
        let up = local_to_world.transform_direction4(&Vec3::y());

        Mat4::look_at(&Point3::from(eye), &Point3::from(center), &up)
    }

    /// Projection matrix for a viewport of `viewport_size` pixels
    ///
    /// The aspect ratio is `width / height`; a zero height is the caller's
    /// responsibility to avoid.
    pub fn projection_matrix(&self, viewport_size: IVec2) -> Mat4 {
        #[allow(clippy::cast_precision_loss)]
        let aspect = viewport_size.x as f32 / viewport_size.y as f32;

        let projection = match self.camera_type {
            CameraType::Perspective => Mat4::perspective(self.fov_y, aspect, self.near, self.far),
            CameraType::Orthographic => {
                let half_height = self.ortho_height * 0.5;
                let half_width = half_height * aspect;
                Mat4::orthographic(-half_width, half_width, -half_height, half_height, self.near, self.far)
            }
        };

        log::trace!(
            "Projection for {:?} camera, viewport {}x{} (aspect {:.3})",
            self.camera_type,
            viewport_size.x,
            viewport_size.y,
            aspect
        );
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_view_is_canonical_look_at() {
        let camera = CameraComponent::default();
        let view = camera.view_matrix(&Mat4::identity());

        let canonical = Mat4::look_at(&Point3::origin(), &Point3::new(0.0, 0.0, -1.0), &Vec3::y());
        assert_relative_eq!(view, canonical, epsilon = EPSILON);
        assert_relative_eq!(view, Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_view_moves_world_opposite_to_camera() {
        let camera = CameraComponent::default();
        let transform = TransformComponent::from_position(Vec3::new(0.0, 2.0, 5.0));
        let view = camera.view_matrix(&transform.to_matrix());

        // The camera's own position lands at the view-space origin
        assert_relative_eq!(view.transform_point4(&Vec3::new(0.0, 2.0, 5.0)), Vec3::zeros(), epsilon = EPSILON);
        // A point straight ahead lies on -Z
        assert_relative_eq!(view.transform_point4(&Vec3::new(0.0, 2.0, 0.0)), Vec3::new(0.0, 0.0, -5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_view_follows_yaw() {
        let camera = CameraComponent::default();
        // Yawed 90 degrees the camera looks down world -X
        let transform = TransformComponent::identity().with_rotation(Vec3::new(0.0, HALF_PI, 0.0));
        let view = camera.view_matrix(&transform.to_matrix());

        assert_relative_eq!(view.transform_point4(&Vec3::new(-3.0, 0.0, 0.0)), Vec3::new(0.0, 0.0, -3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_aspect_handling() {
        let camera = CameraComponent::perspective(utils::deg_to_rad(60.0), 0.1, 100.0);
        let projection = camera.projection_matrix(IVec2::new(200, 100));

        // tan(horizontal half fov) = aspect * tan(vertical half fov)
        let tan_half_vertical = 1.0 / projection[(1, 1)];
        let tan_half_horizontal = 1.0 / projection[(0, 0)];
        assert_relative_eq!(tan_half_horizontal, 2.0 * tan_half_vertical, epsilon = EPSILON);
        assert_relative_eq!(tan_half_vertical, (utils::deg_to_rad(30.0)).tan(), epsilon = EPSILON);
    }

    #[test]
    fn test_orthographic_aspect_handling() {
        let camera = CameraComponent::orthographic(4.0, 0.1, 50.0);
        let projection = camera.projection_matrix(IVec2::new(200, 100));

        // Extents are 2 / scale along each axis
        let horizontal_extent = 2.0 / projection[(0, 0)];
        let vertical_extent = 2.0 / projection[(1, 1)];
        assert_relative_eq!(vertical_extent, 4.0, epsilon = EPSILON);
        assert_relative_eq!(horizontal_extent, 2.0 * vertical_extent, epsilon = EPSILON);
        // Symmetric box: no off-centre translation
        assert_relative_eq!(projection[(0, 3)], 0.0, epsilon = EPSILON);
        assert_relative_eq!(projection[(1, 3)], 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_projection_recomputed_per_viewport() {
        let camera = CameraComponent::default();
        let wide = camera.projection_matrix(IVec2::new(1920, 1080));
        let square = camera.projection_matrix(IVec2::new(512, 512));

        assert!((wide[(0, 0)] - square[(0, 0)]).abs() > 0.1);
        assert_relative_eq!(wide[(1, 1)], square[(1, 1)], epsilon = EPSILON);
    }
}
