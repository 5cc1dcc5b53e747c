//! Serializable asset descriptions
//!
//! A scene file carries an `assets` section listing every shader, texture,
//! sampler, mesh and material by name. Names are unique per kind; materials
//! refer to the other kinds by those names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AssetCache, AssetError, TextureHandle};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::api::GraphicsBackend;
use crate::render::pipeline::PipelineState;
use crate::render::primitives::{MeshData, ShaderStageSource};
use crate::render::resources::{
    BaseMaterial, LitMaterial, Material, SamplerParams, TexturedMaterial, TintedMaterial,
};

/// All assets of a scene, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDescriptions {
    /// Shader programs
    pub shaders: BTreeMap<String, ShaderDescription>,
    /// Textures
    pub textures: BTreeMap<String, TextureDescription>,
    /// Samplers
    pub samplers: BTreeMap<String, SamplerParams>,
    /// Meshes
    pub meshes: BTreeMap<String, MeshDescription>,
    /// Materials
    pub materials: BTreeMap<String, MaterialDescription>,
}

/// Vertex and fragment stage sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderDescription {
    /// Vertex stage
    pub vertex: ShaderStageSource,
    /// Fragment stage
    pub fragment: ShaderStageSource,
}

/// Texture contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureDescription {
    /// Square texture of one RGBA8 color
    Solid {
        /// Fill color
        color: [u8; 4],
        /// Edge length in pixels
        #[serde(default = "default_texture_size")]
        size: u32,
    },
}

fn default_texture_size() -> u32 {
    1
}

/// Procedural geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshDescription {
    /// Unit cube
    Cube,
    /// Unit quad facing +Z
    Quad,
    /// Unit plane facing +Y
    Plane,
    /// UV sphere of radius 1
    Sphere {
        /// Slices around the vertical axis
        segments: u32,
        /// Stacks between the poles
        rings: u32,
    },
}

impl MeshDescription {
    /// Generate the mesh data
    pub fn build(&self) -> MeshData {
        match *self {
            Self::Cube => MeshData::cube(),
            Self::Quad => MeshData::quad(),
            Self::Plane => MeshData::plane(),
            Self::Sphere { segments, rings } => MeshData::sphere(segments, rings),
        }
    }
}

/// Which material layer a description builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// [`BaseMaterial`]
    Base,
    /// [`TintedMaterial`]
    #[default]
    Tinted,
    /// [`TexturedMaterial`]
    Textured,
    /// [`LitMaterial`]
    Lit,
}

/// Flat material description
///
/// Each layer reads only its own fields; fields of higher layers are ignored
/// for lower kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    /// Layer to build
    pub kind: MaterialKind,
    /// Shader program name
    pub shader: String,
    /// Fixed-function state
    pub pipeline_state: PipelineState,
    /// Draw in the transparent queue
    pub transparent: bool,
    /// Tint (tinted and above)
    pub tint: [f32; 4],
    /// Diffuse texture name (textured and above)
    pub texture: Option<String>,
    /// Sampler name (textured and above)
    pub sampler: Option<String>,
    /// Alpha discard threshold (textured and above)
    pub alpha_threshold: f32,
    /// Albedo map name (lit)
    pub albedo_map: Option<String>,
    /// Specular map name (lit)
    pub specular_map: Option<String>,
    /// Ambient occlusion map name (lit)
    pub ambient_occlusion_map: Option<String>,
    /// Roughness map name (lit)
    pub roughness_map: Option<String>,
    /// Emissive map name (lit)
    pub emissive_map: Option<String>,
    /// Albedo multiplier (lit)
    pub albedo_tint: [f32; 3],
    /// Specular multiplier (lit)
    pub specular_tint: [f32; 3],
    /// Roughness remap range (lit)
    pub roughness_range: [f32; 2],
    /// Emissive multiplier (lit)
    pub emissive_tint: [f32; 3],
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            kind: MaterialKind::default(),
            shader: String::new(),
            pipeline_state: PipelineState::default(),
            transparent: false,
            tint: [1.0; 4],
            texture: None,
            sampler: None,
            alpha_threshold: 0.0,
            albedo_map: None,
            specular_map: None,
            ambient_occlusion_map: None,
            roughness_map: None,
            emissive_map: None,
            albedo_tint: [1.0; 3],
            specular_tint: [1.0; 3],
            roughness_range: [0.0, 1.0],
            emissive_tint: [1.0; 3],
        }
    }
}

impl MaterialDescription {
    /// Resolve names against the cache and build the material
    ///
    /// Missing shaders and samplers are errors. Missing textures resolve to the
    /// cache's fallback texture.
    pub fn build(&self, assets: &mut AssetCache, gpu: &mut dyn GraphicsBackend) -> Result<Material, AssetError> {
        let base = BaseMaterial::new(assets.require_shader(&self.shader)?, self.pipeline_state, self.transparent);
        if self.kind == MaterialKind::Base {
            return Ok(Material::Base(base));
        }

        let tinted = TintedMaterial { base, tint: Vec4::from(self.tint) };
        if self.kind == MaterialKind::Tinted {
            return Ok(Material::Tinted(tinted));
        }

        let sampler = self
            .sampler
            .as_deref()
            .map(|name| assets.require_sampler(name))
            .transpose()?;
        let textured = TexturedMaterial {
            tinted,
            texture: resolve_texture(assets, gpu, self.texture.as_deref())?,
            sampler,
            alpha_threshold: self.alpha_threshold,
        };
        if self.kind == MaterialKind::Textured {
            return Ok(Material::Textured(textured));
        }

        Ok(Material::Lit(LitMaterial {
            textured,
            albedo_map: resolve_texture(assets, gpu, self.albedo_map.as_deref())?,
            specular_map: resolve_texture(assets, gpu, self.specular_map.as_deref())?,
            ambient_occlusion_map: resolve_texture(assets, gpu, self.ambient_occlusion_map.as_deref())?,
            roughness_map: resolve_texture(assets, gpu, self.roughness_map.as_deref())?,
            emissive_map: resolve_texture(assets, gpu, self.emissive_map.as_deref())?,
            sampler,
            albedo_tint: Vec3::from(self.albedo_tint),
            specular_tint: Vec3::from(self.specular_tint),
            roughness_range: Vec2::from(self.roughness_range),
            emissive_tint: Vec3::from(self.emissive_tint),
        }))
    }
}

fn resolve_texture(
    assets: &mut AssetCache,
    gpu: &mut dyn GraphicsBackend,
    name: Option<&str>,
) -> Result<Option<TextureHandle>, AssetError> {
    name.map(|name| assets.texture_or_fallback(name, gpu)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, ConfigFormat};
    use crate::render::backends::HeadlessBackend;
    use std::path::Path;

    const ASSETS: &str = r#"(
        shaders: {
            "flat": (vertex: inline("void main() {}"), fragment: inline("void main() {}")),
        },
        textures: {
            "checker": solid(color: (40, 40, 40, 255), size: 2),
        },
        samplers: {
            "linear": (),
        },
        meshes: {
            "ball": sphere(segments: 8, rings: 6),
            "box": cube,
        },
        materials: {
            "glass": (kind: tinted, shader: "flat", transparent: true, tint: (0.5, 0.8, 1.0, 0.4)),
            "ground": (kind: lit, shader: "flat", texture: "checker", sampler: "linear", albedo_map: "nope"),
        },
    )"#;

    #[test]
    fn test_load_from_description() {
        let descriptions: AssetDescriptions = parse_str(ASSETS, ConfigFormat::Ron).unwrap();
        let mut gpu = HeadlessBackend::new();
        let mut cache = AssetCache::new();

        cache.load_descriptions(&descriptions, Path::new("."), &mut gpu).unwrap();

        let glass = cache.material(cache.material_handle("glass").unwrap()).unwrap();
        assert!(glass.is_transparent());
        assert!(matches!(glass, Material::Tinted(t) if t.tint == Vec4::new(0.5, 0.8, 1.0, 0.4)));

        let ground = cache.material(cache.material_handle("ground").unwrap()).unwrap();
        let Material::Lit(lit) = ground else {
            panic!("ground should be lit, got {:?}", ground);
        };
        assert_eq!(lit.textured.texture, cache.texture_handle("checker"));
        // Unknown map names fall back to the shared white texture
        assert!(lit.albedo_map.is_some());
        assert!(cache.texture_handle("nope").is_none());
        assert!(!ground.is_transparent());
    }

    #[test]
    fn test_unknown_shader_is_an_error() {
        let descriptions: AssetDescriptions = parse_str(
            r#"(materials: { "bad": (kind: base, shader: "missing") })"#,
            ConfigFormat::Ron,
        )
        .unwrap();
        let mut gpu = HeadlessBackend::new();
        let mut cache = AssetCache::new();

        let result = cache.load_descriptions(&descriptions, Path::new("."), &mut gpu);
        assert!(matches!(result, Err(AssetError::UnknownReference { kind: "shader", .. })));
    }
}
