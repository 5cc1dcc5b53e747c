//! Core rendering primitives

pub mod mesh;
pub mod shader;

pub use mesh::{Mesh, MeshData, Vertex};
pub use shader::{ShaderProgram, ShaderSources, ShaderStageSource};
