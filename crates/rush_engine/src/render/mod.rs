//! # Rendering System
//!
//! Forward rendering for the ECS world.
//!
//! ## Architecture
//!
//! - **API**: [`GraphicsBackend`], the boundary to the GPU, plus backend object names
//! - **Backends**: [`backends::HeadlessBackend`], a recording backend without a GPU
//! - **Primitives**: meshes and shader programs
//! - **Pipeline**: fixed-function state applied by materials
//! - **Resources**: textures, samplers and the layered materials
//! - **Forward renderer**: command extraction, transparency ordering and the
//!   per-draw uniform contract
//!
//! GPU resources are owned by the [`crate::assets::AssetCache`]; the renderer
//! only looks them up through handles.

pub mod api;
pub mod backends;
pub mod primitives;
pub mod pipeline;
pub mod resources;
pub mod systems;
pub mod render_queue;
pub mod forward_renderer;


pub use api::{BackendResult, ClearFlags, GraphicsBackend, UniformValue};
pub use forward_renderer::{ForwardRenderer, FrameStats};
pub use pipeline::PipelineState;
pub use primitives::{Mesh, MeshData, ShaderProgram, ShaderSources, Vertex};
pub use render_queue::{LightCommand, RenderCommand, RenderQueue};
pub use resources::{Material, Sampler, Texture};

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering system errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// GPU resource creation failed
    #[error("Failed to create resource: {0}")]
    ResourceCreationFailed(String),

    /// A handle on a drawable no longer resolves in the asset cache
    #[error("Drawable references a {kind} that is not in the asset cache")]
    MissingAsset {
        /// Asset kind ("mesh", "material", "shader", ...)
        kind: &'static str,
    },
}
