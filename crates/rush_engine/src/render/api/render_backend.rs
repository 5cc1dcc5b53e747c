//! Backend abstraction traits for the rendering system
//!
//! [`GraphicsBackend`] is the boundary between the forward renderer and the
//! GPU. It mirrors an immediate-mode API: state setters, program binding,
//! named uniform upload and indexed draws, all issued in program order from a
//! single thread.

use bitflags::bitflags;

use crate::foundation::math::{IVec2, Mat4, Vec2, Vec3, Vec4};
use crate::render::pipeline::{ColorMask, PipelineState};
use crate::render::primitives::{ShaderSources, Vertex};
use crate::render::resources::{SamplerParams, TextureData};
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Backend name of an uploaded mesh (vertex + index buffers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Backend name of a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u64);

/// Backend name of a texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Backend name of a sampler object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerId(pub u64);

bitflags! {
    /// Buffers affected by a clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Color attachment
        const COLOR = 1 << 0;
        /// Depth attachment
        const DEPTH = 1 << 1;
        /// Stencil attachment
        const STENCIL = 1 << 2;
    }
}

/// A value for a named shader uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// 4x4 matrix
    Mat4(Mat4),
    /// 4 component vector
    Vec4(Vec4),
    /// 3 component vector
    Vec3(Vec3),
    /// 2 component vector
    Vec2(Vec2),
    /// Scalar float
    Float(f32),
    /// Scalar integer (also used for sampler units)
    Int(i32),
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        Self::Vec2(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

/// Main graphics backend trait
///
/// Resource creation can fail; per-frame state and draw calls cannot, because
/// submission failures are not modelled.
pub trait GraphicsBackend {
    /// Set the viewport rectangle in pixels
    fn set_viewport(&mut self, origin: IVec2, size: IVec2);

    /// Color used by subsequent color clears
    fn set_clear_color(&mut self, color: Vec4);

    /// Depth used by subsequent depth clears
    fn set_clear_depth(&mut self, depth: f32);

    /// Enable or disable writes per color channel
    fn set_color_mask(&mut self, mask: ColorMask);

    /// Enable or disable depth writes
    fn set_depth_mask(&mut self, enabled: bool);

    /// Clear the selected buffers, subject to the current write masks
    fn clear(&mut self, flags: ClearFlags);

    /// Apply culling, depth, blending and mask state
    fn apply_pipeline_state(&mut self, state: &PipelineState);

    /// Compile and link a program
    fn create_program(&mut self, sources: &ShaderSources) -> BackendResult<ProgramId>;

    /// Make a program current
    fn use_program(&mut self, program: ProgramId);

    /// Upload a named uniform to a program
    ///
    /// `transpose` asks the backend to transpose matrix values on upload.
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue, transpose: bool);

    /// Upload immutable vertex and index buffers
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshId>;

    /// Bind a mesh and draw `index_count` indices as triangles
    fn draw_mesh(&mut self, mesh: MeshId, index_count: u32);

    /// Upload RGBA8 texture data
    fn create_texture(&mut self, data: &TextureData) -> BackendResult<TextureId>;

    /// Bind a texture (or nothing) to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>);

    /// Create a sampler object
    fn create_sampler(&mut self, params: &SamplerParams) -> BackendResult<SamplerId>;

    /// Bind a sampler (or nothing) to a texture unit
    fn bind_sampler(&mut self, unit: u32, sampler: Option<SamplerId>);

    /// Destroy a program
    fn release_program(&mut self, program: ProgramId);

    /// Destroy a mesh
    fn release_mesh(&mut self, mesh: MeshId);

    /// Destroy a texture
    fn release_texture(&mut self, texture: TextureId);

    /// Destroy a sampler
    fn release_sampler(&mut self, sampler: SamplerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_conversions() {
        assert_eq!(UniformValue::from(3_i32), UniformValue::Int(3));
        assert_eq!(UniformValue::from(0.5_f32), UniformValue::Float(0.5));
        assert_eq!(UniformValue::from(Vec2::new(1.0, 2.0)), UniformValue::Vec2(Vec2::new(1.0, 2.0)));
        assert_eq!(UniformValue::from(Mat4::identity()), UniformValue::Mat4(Mat4::identity()));
    }
}
