//! Headless recording backend
//!
//! Implements [`GraphicsBackend`] without a GPU. Every call is appended to a
//! command log and a small simulated framebuffer tracks what clears and draws
//! would have done. The binary runs on it and the renderer tests assert
//! against it.

use std::collections::HashMap;

use crate::foundation::math::{IVec2, Vec4};
use crate::render::api::{
    BackendResult, ClearFlags, GraphicsBackend, MeshId, ProgramId, SamplerId, TextureId, UniformValue,
};
use crate::render::pipeline::{ColorMask, PipelineState};
use crate::render::primitives::{ShaderSources, Vertex};
use crate::render::resources::{SamplerParams, TextureData};
use crate::render::RenderError;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum GpuCommand {
    SetViewport { origin: IVec2, size: IVec2 },
    SetClearColor(Vec4),
    SetClearDepth(f32),
    SetColorMask(ColorMask),
    SetDepthMask(bool),
    Clear(ClearFlags),
    ApplyPipelineState(PipelineState),
    UseProgram(ProgramId),
    SetUniform { program: ProgramId, name: String, value: UniformValue, transpose: bool },
    BindTexture { unit: u32, texture: Option<TextureId> },
    BindSampler { unit: u32, sampler: Option<SamplerId> },
    DrawMesh { mesh: MeshId, index_count: u32 },
}

/// Simulated framebuffer contents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framebuffer {
    /// Color every pixel would hold after the last clear
    pub color: Vec4,
    /// Depth every pixel would hold after the last clear
    pub depth: f32,
    /// Number of clears that touched at least one buffer
    pub clears: usize,
    /// Number of draw calls
    pub draws: usize,
}

impl Default for Framebuffer {
    fn default() -> Self {
        // Garbage contents until the first clear
        Self {
            color: Vec4::new(1.0, 0.0, 1.0, 1.0),
            depth: 0.5,
            clears: 0,
            draws: 0,
        }
    }
}

/// Current context state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextState {
    /// Viewport origin
    pub viewport_origin: IVec2,
    /// Viewport size
    pub viewport_size: IVec2,
    /// Clear color
    pub clear_color: Vec4,
    /// Clear depth
    pub clear_depth: f32,
    /// Color write mask
    pub color_mask: ColorMask,
    /// Depth write mask
    pub depth_mask: bool,
    /// Last applied pipeline state
    pub pipeline_state: PipelineState,
    /// Bound program
    pub program: Option<ProgramId>,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            viewport_origin: IVec2::zeros(),
            viewport_size: IVec2::zeros(),
            clear_color: Vec4::zeros(),
            clear_depth: 1.0,
            color_mask: ColorMask::all(),
            depth_mask: true,
            pipeline_state: PipelineState::default(),
            program: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MeshRecord {
    vertex_bytes: usize,
    index_count: usize,
}

/// Recording backend without a GPU
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    commands: Vec<GpuCommand>,
    framebuffer: Framebuffer,
    state: ContextState,
    next_id: u64,
    programs: HashMap<ProgramId, ShaderSources>,
    meshes: HashMap<MeshId, MeshRecord>,
    textures: HashMap<TextureId, (u32, u32)>,
    samplers: HashMap<SamplerId, SamplerParams>,
    uniforms: HashMap<(ProgramId, String), UniformValue>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded since creation or the last [`HeadlessBackend::take_commands`]
    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    /// Drain the command log
    pub fn take_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Simulated framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Current context state
    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Last value uploaded to a uniform of a program
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(&(program, name.to_string()))
    }

    /// Number of live GPU objects (programs, meshes, textures, samplers)
    pub fn live_objects(&self) -> usize {
        self.programs.len() + self.meshes.len() + self.textures.len() + self.samplers.len()
    }

    /// Total vertex buffer bytes held by live meshes
    pub fn vertex_memory(&self) -> usize {
        self.meshes.values().map(|mesh| mesh.vertex_bytes).sum()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn set_viewport(&mut self, origin: IVec2, size: IVec2) {
        self.state.viewport_origin = origin;
        self.state.viewport_size = size;
        self.commands.push(GpuCommand::SetViewport { origin, size });
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.state.clear_color = color;
        self.commands.push(GpuCommand::SetClearColor(color));
    }

    fn set_clear_depth(&mut self, depth: f32) {
        self.state.clear_depth = depth;
        self.commands.push(GpuCommand::SetClearDepth(depth));
    }

    fn set_color_mask(&mut self, mask: ColorMask) {
        self.state.color_mask = mask;
        self.commands.push(GpuCommand::SetColorMask(mask));
    }

    fn set_depth_mask(&mut self, enabled: bool) {
        self.state.depth_mask = enabled;
        self.commands.push(GpuCommand::SetDepthMask(enabled));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.commands.push(GpuCommand::Clear(flags));

        let mut touched = false;
        if flags.contains(ClearFlags::COLOR) {
            let channels = [ColorMask::RED, ColorMask::GREEN, ColorMask::BLUE, ColorMask::ALPHA];
            for (index, channel) in channels.into_iter().enumerate() {
                if self.state.color_mask.contains(channel) {
                    self.framebuffer.color[index] = self.state.clear_color[index];
                    touched = true;
                }
            }
        }
        if flags.contains(ClearFlags::DEPTH) && self.state.depth_mask {
            self.framebuffer.depth = self.state.clear_depth;
            touched = true;
        }
        if touched {
            self.framebuffer.clears += 1;
        }
    }

    fn apply_pipeline_state(&mut self, state: &PipelineState) {
        self.state.pipeline_state = *state;
        self.state.color_mask = state.color_mask;
        self.state.depth_mask = state.depth_mask;
        self.commands.push(GpuCommand::ApplyPipelineState(*state));
    }

    fn create_program(&mut self, sources: &ShaderSources) -> BackendResult<ProgramId> {
        let id = ProgramId(self.allocate_id());
        self.programs.insert(id, sources.clone());
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) {
        if !self.programs.contains_key(&program) {
            log::warn!("Binding unknown program {:?}", program);
        }
        self.state.program = Some(program);
        self.commands.push(GpuCommand::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue, transpose: bool) {
        if self.state.program != Some(program) {
            log::warn!("Uniform '{}' set on {:?} while it is not bound", name, program);
        }
        let stored = match (value, transpose) {
            (UniformValue::Mat4(matrix), true) => UniformValue::Mat4(matrix.transpose()),
            _ => value,
        };
        self.uniforms.insert((program, name.to_string()), stored);
        self.commands.push(GpuCommand::SetUniform {
            program,
            name: name.to_string(),
            value,
            transpose,
        });
    }

    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshId> {
        let vertex_bytes = bytemuck::cast_slice::<Vertex, u8>(vertices).len();
        if let Some(&bad) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }
        let id = MeshId(self.allocate_id());
        self.meshes.insert(id, MeshRecord { vertex_bytes, index_count: indices.len() });
        Ok(id)
    }

    fn draw_mesh(&mut self, mesh: MeshId, index_count: u32) {
        match self.meshes.get(&mesh) {
            Some(record) if record.index_count < index_count as usize => {
                log::warn!("Draw of {:?} reads past its {} indices", mesh, record.index_count);
            }
            None => log::warn!("Drawing unknown mesh {:?}", mesh),
            _ => {}
        }
        self.framebuffer.draws += 1;
        self.commands.push(GpuCommand::DrawMesh { mesh, index_count });
    }

    fn create_texture(&mut self, data: &TextureData) -> BackendResult<TextureId> {
        data.validate()?;
        let id = TextureId(self.allocate_id());
        self.textures.insert(id, (data.width, data.height));
        Ok(id)
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        self.commands.push(GpuCommand::BindTexture { unit, texture });
    }

    fn create_sampler(&mut self, params: &SamplerParams) -> BackendResult<SamplerId> {
        let id = SamplerId(self.allocate_id());
        self.samplers.insert(id, *params);
        Ok(id)
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<SamplerId>) {
        self.commands.push(GpuCommand::BindSampler { unit, sampler });
    }

    fn release_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        self.uniforms.retain(|(owner, _), _| *owner != program);
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn release_sampler(&mut self, sampler: SamplerId) {
        self.samplers.remove(&sampler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;

    #[test]
    fn test_clear_respects_write_masks() {
        let mut gpu = HeadlessBackend::new();
        gpu.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        gpu.set_clear_depth(1.0);
        gpu.set_color_mask(ColorMask::empty());
        gpu.set_depth_mask(false);

        gpu.clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        assert_eq!(*gpu.framebuffer(), Framebuffer::default());

        gpu.set_color_mask(ColorMask::all());
        gpu.set_depth_mask(true);
        gpu.clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        assert_eq!(gpu.framebuffer().color, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(gpu.framebuffer().depth, 1.0);
        assert_eq!(gpu.framebuffer().clears, 1);
    }

    #[test]
    fn test_pipeline_state_carries_masks() {
        let mut gpu = HeadlessBackend::new();
        gpu.apply_pipeline_state(&PipelineState::alpha_blended());
        assert!(!gpu.state().depth_mask);
    }

    #[test]
    fn test_transposed_uniform_upload() {
        let mut gpu = HeadlessBackend::new();
        let program = gpu.create_program(&ShaderSources::new("v", "f")).unwrap();
        let matrix = Mat4::new_translation(&crate::foundation::math::Vec3::new(1.0, 2.0, 3.0));

        gpu.use_program(program);
        gpu.set_uniform(program, "m", UniformValue::Mat4(matrix), true);

        assert_eq!(gpu.uniform(program, "m"), Some(&UniformValue::Mat4(matrix.transpose())));
    }

    #[test]
    fn test_mesh_indices_validated() {
        let mut gpu = HeadlessBackend::new();
        let vertex = Vertex::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]);

        assert!(gpu.create_mesh(&[vertex; 3], &[0, 1, 2]).is_ok());
        assert!(gpu.create_mesh(&[vertex; 3], &[0, 1, 3]).is_err());
        assert_eq!(gpu.vertex_memory(), 3 * std::mem::size_of::<Vertex>());
    }
}
