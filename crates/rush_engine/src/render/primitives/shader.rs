//! Shader programs and named uniform upload

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::api::{BackendResult, GraphicsBackend, ProgramId, UniformValue};
use crate::render::RenderError;

/// Source of one shader stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStageSource {
    /// File path, relative paths resolve against the asset root
    Path(PathBuf),
    /// Source text embedded in the description
    Inline(String),
}

impl ShaderStageSource {
    /// Load the stage text
    pub fn load(&self, asset_root: &Path) -> Result<String, std::io::Error> {
        match self {
            Self::Inline(source) => Ok(source.clone()),
            Self::Path(path) => std::fs::read_to_string(asset_root.join(path)),
        }
    }
}

/// Loaded source text for a vertex + fragment program
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderSources {
    /// Vertex stage
    pub vertex: String,
    /// Fragment stage
    pub fragment: String,
}

impl ShaderSources {
    /// Build from source strings
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// A linked shader program
///
/// Uniforms are addressed by name. Upload goes to the currently bound
/// program, so [`ShaderProgram::use_program`] comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    id: ProgramId,
}

impl ShaderProgram {
    /// Compile and link a program
    pub fn create(sources: &ShaderSources, gpu: &mut dyn GraphicsBackend) -> BackendResult<Self> {
        if sources.vertex.trim().is_empty() || sources.fragment.trim().is_empty() {
            return Err(RenderError::ResourceCreationFailed("shader stage source is empty".to_string()));
        }
        let id = gpu.create_program(sources)?;
        Ok(Self { id })
    }

    /// Backend name
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Make this the current program
    pub fn use_program(&self, gpu: &mut dyn GraphicsBackend) {
        gpu.use_program(self.id);
    }

    /// Upload a uniform by name
    pub fn set(&self, gpu: &mut dyn GraphicsBackend, name: &str, value: impl Into<UniformValue>) {
        gpu.set_uniform(self.id, name, value.into(), false);
    }

    /// Upload a matrix uniform that the backend transposes on the way in
    pub fn set_transposed(&self, gpu: &mut dyn GraphicsBackend, name: &str, value: impl Into<UniformValue>) {
        gpu.set_uniform(self.id, name, value.into(), true);
    }
}
