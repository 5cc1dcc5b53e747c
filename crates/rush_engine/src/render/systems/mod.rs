//! Render-side systems

pub mod lighting;

pub use lighting::{upload_lights, LightUniform};
