//! Public rendering API: the backend boundary

pub mod render_backend;

pub use render_backend::{
    BackendResult, ClearFlags, GraphicsBackend, MeshId, ProgramId, SamplerId, TextureId, UniformValue,
};
