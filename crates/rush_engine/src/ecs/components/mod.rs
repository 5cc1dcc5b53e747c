//! Built-in components

pub mod transform;
pub mod camera;
pub mod mesh_renderer;
pub mod lighting;
pub mod movement;
pub mod collision;

pub use transform::TransformComponent;
pub use camera::{CameraComponent, CameraType};
pub use mesh_renderer::MeshRendererComponent;
pub use lighting::{Attenuation, ConeAngles, LightComponent, LightType};
pub use movement::MovementComponent;
pub use collision::{ColliderComponent, ColliderRole};
