//! Layered materials
//!
//! Each layer wraps the one below it and adds uniforms:
//!
//! | Layer                | Adds                                                    |
//! |----------------------|---------------------------------------------------------|
//! | [`BaseMaterial`]     | shader program, pipeline state, transparency flag       |
//! | [`TintedMaterial`]   | `tint`                                                  |
//! | [`TexturedMaterial`] | `alphaThreshold`, diffuse texture `tex` on unit 0       |
//! | [`LitMaterial`]      | `material.*` maps on units 1..=5 and their tints        |
//!
//! `setup` on any layer first runs the layer it wraps, so base state is always
//! applied before anything layered on top.

use crate::assets::{AssetCache, SamplerHandle, ShaderHandle, TextureHandle};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::api::GraphicsBackend;
use crate::render::pipeline::PipelineState;
use crate::render::primitives::ShaderProgram;
use crate::render::{RenderError, RenderResult};

/// Texture unit of the diffuse texture of a textured material
pub const DIFFUSE_TEXTURE_UNIT: u32 = 0;

/// Shader program, fixed-function state and transparency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseMaterial {
    /// Program drawing with this material
    pub shader: ShaderHandle,
    /// Fixed-function state
    pub pipeline_state: PipelineState,
    /// Whether draws go to the transparent queue
    pub transparent: bool,
}

impl BaseMaterial {
    /// Create a base material
    pub fn new(shader: ShaderHandle, pipeline_state: PipelineState, transparent: bool) -> Self {
        Self { shader, pipeline_state, transparent }
    }

    /// Apply pipeline state and bind the program
    pub fn setup(&self, assets: &AssetCache, gpu: &mut dyn GraphicsBackend) -> RenderResult<ShaderProgram> {
        let program = *assets
            .shader(self.shader)
            .ok_or(RenderError::MissingAsset { kind: "shader" })?;
        self.pipeline_state.setup(gpu);
        program.use_program(gpu);
        Ok(program)
    }

    fn validate(&self, assets: &AssetCache) -> RenderResult<()> {
        assets
            .shader(self.shader)
            .map(|_| ())
            .ok_or(RenderError::MissingAsset { kind: "shader" })
    }
}

/// Base material plus a constant color tint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintedMaterial {
    /// Layer below
    pub base: BaseMaterial,
    /// RGBA multiplier
    pub tint: Vec4,
}

impl TintedMaterial {
    /// Base setup, then `tint`
    pub fn setup(&self, assets: &AssetCache, gpu: &mut dyn GraphicsBackend) -> RenderResult<ShaderProgram> {
        let program = self.base.setup(assets, gpu)?;
        program.set(gpu, "tint", self.tint);
        Ok(program)
    }
}

/// Tinted material sampling a diffuse texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedMaterial {
    /// Layer below
    pub tinted: TintedMaterial,
    /// Diffuse texture, unbound when `None`
    pub texture: Option<TextureHandle>,
    /// Sampler for the diffuse texture
    pub sampler: Option<SamplerHandle>,
    /// Fragments with alpha below this are discarded
    pub alpha_threshold: f32,
}

impl TexturedMaterial {
    /// Tinted setup, then `alphaThreshold` and the texture on unit 0
    pub fn setup(&self, assets: &AssetCache, gpu: &mut dyn GraphicsBackend) -> RenderResult<ShaderProgram> {
        let program = self.tinted.setup(assets, gpu)?;
        program.set(gpu, "alphaThreshold", self.alpha_threshold);
        bind_unit(assets, gpu, DIFFUSE_TEXTURE_UNIT, self.texture, self.sampler)?;
        program.set(gpu, "tex", unit_uniform(DIFFUSE_TEXTURE_UNIT));
        Ok(program)
    }
}

/// Textured material with a full lighting map set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitMaterial {
    /// Layer below
    pub textured: TexturedMaterial,
    /// Albedo map
    pub albedo_map: Option<TextureHandle>,
    /// Specular map
    pub specular_map: Option<TextureHandle>,
    /// Ambient occlusion map
    pub ambient_occlusion_map: Option<TextureHandle>,
    /// Roughness map
    pub roughness_map: Option<TextureHandle>,
    /// Emissive map
    pub emissive_map: Option<TextureHandle>,
    /// Sampler shared by all maps
    pub sampler: Option<SamplerHandle>,
    /// Albedo multiplier
    pub albedo_tint: Vec3,
    /// Specular multiplier
    pub specular_tint: Vec3,
    /// Roughness remap range (min, max)
    pub roughness_range: Vec2,
    /// Emissive multiplier
    pub emissive_tint: Vec3,
}

impl LitMaterial {
    /// Textured setup, then the map set on units 1 to 5 and the tints
    pub fn setup(&self, assets: &AssetCache, gpu: &mut dyn GraphicsBackend) -> RenderResult<ShaderProgram> {
        let program = self.textured.setup(assets, gpu)?;

        for (unit, (name, map)) in (1_u32..).zip(self.maps()) {
            bind_unit(assets, gpu, unit, map, self.sampler)?;
            program.set(gpu, name, unit_uniform(unit));
        }

        program.set(gpu, "material.albedo_tint", self.albedo_tint);
        program.set(gpu, "material.specular_tint", self.specular_tint);
        program.set(gpu, "material.roughness_range", self.roughness_range);
        program.set(gpu, "material.emissive_tint", self.emissive_tint);
        Ok(program)
    }

    fn maps(&self) -> [(&'static str, Option<TextureHandle>); 5] {
        [
            ("material.albedo_map", self.albedo_map),
            ("material.specular_map", self.specular_map),
            ("material.ambient_occlusion_map", self.ambient_occlusion_map),
            ("material.roughness_map", self.roughness_map),
            ("material.emissive_map", self.emissive_map),
        ]
    }
}

/// Any material layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Shader and pipeline state only
    Base(BaseMaterial),
    /// With tint
    Tinted(TintedMaterial),
    /// With diffuse texture
    Textured(TexturedMaterial),
    /// With lighting maps
    Lit(LitMaterial),
}

impl Material {
    /// The innermost layer
    pub fn base(&self) -> &BaseMaterial {
        match self {
            Self::Base(base) => base,
            Self::Tinted(tinted) => &tinted.base,
            Self::Textured(textured) => &textured.tinted.base,
            Self::Lit(lit) => &lit.textured.tinted.base,
        }
    }

    /// Mutable access to the innermost layer
    pub fn base_mut(&mut self) -> &mut BaseMaterial {
        match self {
            Self::Base(base) => base,
            Self::Tinted(tinted) => &mut tinted.base,
            Self::Textured(textured) => &mut textured.tinted.base,
            Self::Lit(lit) => &mut lit.textured.tinted.base,
        }
    }

    /// Whether draws with this material belong to the transparent queue
    pub fn is_transparent(&self) -> bool {
        self.base().transparent
    }

    /// Bind everything this material needs and return the bound program
    pub fn setup(&self, assets: &AssetCache, gpu: &mut dyn GraphicsBackend) -> RenderResult<ShaderProgram> {
        match self {
            Self::Base(base) => base.setup(assets, gpu),
            Self::Tinted(tinted) => tinted.setup(assets, gpu),
            Self::Textured(textured) => textured.setup(assets, gpu),
            Self::Lit(lit) => lit.setup(assets, gpu),
        }
    }

    /// Check that every referenced asset is still in the cache
    pub fn validate(&self, assets: &AssetCache) -> RenderResult<()> {
        self.base().validate(assets)?;
        let (textures, samplers): (Vec<Option<TextureHandle>>, Vec<Option<SamplerHandle>>) = match self {
            Self::Base(_) | Self::Tinted(_) => (Vec::new(), Vec::new()),
            Self::Textured(textured) => (vec![textured.texture], vec![textured.sampler]),
            Self::Lit(lit) => {
                let mut textures = vec![lit.textured.texture];
                textures.extend(lit.maps().iter().map(|(_, map)| *map));
                (textures, vec![lit.textured.sampler, lit.sampler])
            }
        };

        if textures.iter().flatten().any(|&handle| assets.texture(handle).is_none()) {
            return Err(RenderError::MissingAsset { kind: "texture" });
        }
        if samplers.iter().flatten().any(|&handle| assets.sampler(handle).is_none()) {
            return Err(RenderError::MissingAsset { kind: "sampler" });
        }
        Ok(())
    }
}

fn bind_unit(
    assets: &AssetCache,
    gpu: &mut dyn GraphicsBackend,
    unit: u32,
    texture: Option<TextureHandle>,
    sampler: Option<SamplerHandle>,
) -> RenderResult<()> {
    match texture {
        Some(handle) => assets
            .texture(handle)
            .ok_or(RenderError::MissingAsset { kind: "texture" })?
            .bind(gpu, unit),
        None => gpu.bind_texture(unit, None),
    }
    match sampler {
        Some(handle) => assets
            .sampler(handle)
            .ok_or(RenderError::MissingAsset { kind: "sampler" })?
            .bind(gpu, unit),
        None => gpu.bind_sampler(unit, None),
    }
    Ok(())
}

fn unit_uniform(unit: u32) -> i32 {
    i32::try_from(unit).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::UniformValue;
    use crate::render::backends::{GpuCommand, HeadlessBackend};
    use crate::render::primitives::ShaderSources;
    use crate::render::resources::{Sampler, SamplerParams, Texture, TextureData};

    struct Fixture {
        gpu: HeadlessBackend,
        assets: AssetCache,
        base: BaseMaterial,
        texture: TextureHandle,
        sampler: SamplerHandle,
    }

    fn fixture() -> Fixture {
        let mut gpu = HeadlessBackend::new();
        let mut assets = AssetCache::new();
        let program = ShaderProgram::create(&ShaderSources::new("v", "f"), &mut gpu).unwrap();
        let shader = assets.add_shader("lit", program).unwrap();
        let texture = assets
            .add_texture("white", Texture::upload(&TextureData::solid([255; 4], 2), &mut gpu).unwrap())
            .unwrap();
        let sampler = assets
            .add_sampler("linear", Sampler::create(SamplerParams::default(), &mut gpu).unwrap())
            .unwrap();
        gpu.take_commands();

        Fixture {
            gpu,
            assets,
            base: BaseMaterial::new(shader, PipelineState::opaque(), false),
            texture,
            sampler,
        }
    }

    fn uniform_names(commands: &[GpuCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|command| match command {
                GpuCommand::SetUniform { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn lit(fixture: &Fixture) -> LitMaterial {
        LitMaterial {
            textured: TexturedMaterial {
                tinted: TintedMaterial { base: fixture.base, tint: Vec4::new(1.0, 0.5, 0.5, 1.0) },
                texture: Some(fixture.texture),
                sampler: Some(fixture.sampler),
                alpha_threshold: 0.1,
            },
            albedo_map: Some(fixture.texture),
            specular_map: None,
            ambient_occlusion_map: None,
            roughness_map: None,
            emissive_map: Some(fixture.texture),
            sampler: Some(fixture.sampler),
            albedo_tint: Vec3::new(1.0, 1.0, 1.0),
            specular_tint: Vec3::new(0.5, 0.5, 0.5),
            roughness_range: Vec2::new(0.2, 0.8),
            emissive_tint: Vec3::zeros(),
        }
    }

    #[test]
    fn test_base_applies_state_before_binding() {
        let mut fixture = fixture();
        let program = fixture.base.setup(&fixture.assets, &mut fixture.gpu).unwrap();

        assert_eq!(
            fixture.gpu.commands(),
            &[
                GpuCommand::ApplyPipelineState(PipelineState::opaque()),
                GpuCommand::UseProgram(program.id()),
            ]
        );
    }

    #[test]
    fn test_lit_setup_runs_every_layer_in_order() {
        let mut fixture = fixture();
        let material = Material::Lit(lit(&fixture));

        let program = material.setup(&fixture.assets, &mut fixture.gpu).unwrap();

        let commands = fixture.gpu.commands();
        assert!(matches!(commands[0], GpuCommand::ApplyPipelineState(_)));
        assert_eq!(commands[1], GpuCommand::UseProgram(program.id()));
        assert_eq!(
            uniform_names(commands),
            vec![
                "tint",
                "alphaThreshold",
                "tex",
                "material.albedo_map",
                "material.specular_map",
                "material.ambient_occlusion_map",
                "material.roughness_map",
                "material.emissive_map",
                "material.albedo_tint",
                "material.specular_tint",
                "material.roughness_range",
                "material.emissive_tint",
            ]
        );
        assert_eq!(fixture.gpu.uniform(program.id(), "tex"), Some(&UniformValue::Int(0)));
        assert_eq!(
            fixture.gpu.uniform(program.id(), "material.emissive_map"),
            Some(&UniformValue::Int(5))
        );
    }

    #[test]
    fn test_unset_maps_unbind_their_unit() {
        let mut fixture = fixture();
        let material = lit(&fixture);

        material.setup(&fixture.assets, &mut fixture.gpu).unwrap();

        let specular_unit = GpuCommand::BindTexture { unit: 2, texture: None };
        assert!(fixture.gpu.commands().contains(&specular_unit));
        let diffuse = fixture.assets.texture(fixture.texture).unwrap().id();
        assert!(fixture
            .gpu
            .commands()
            .contains(&GpuCommand::BindTexture { unit: DIFFUSE_TEXTURE_UNIT, texture: Some(diffuse) }));
    }

    #[test]
    fn test_transparency_comes_from_base() {
        let fixture = fixture();
        let mut material = Material::Textured(lit(&fixture).textured);
        assert!(!material.is_transparent());

        material.base_mut().transparent = true;
        assert!(material.is_transparent());
    }

    #[test]
    fn test_validate_reports_missing_texture() {
        let mut fixture = fixture();
        let material = Material::Lit(lit(&fixture));
        assert!(material.validate(&fixture.assets).is_ok());

        fixture.assets.clear(&mut fixture.gpu);
        assert_eq!(
            material.validate(&fixture.assets),
            Err(RenderError::MissingAsset { kind: "shader" })
        );
    }
}
