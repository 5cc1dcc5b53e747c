//! Textures and samplers

use serde::{Deserialize, Serialize};

use crate::render::api::{BackendResult, GraphicsBackend, SamplerId, TextureId};
use crate::render::RenderError;

/// RGBA8 pixel data ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Square texture filled with one color
    pub fn solid(color: [u8; 4], size: u32) -> Self {
        let size = size.max(1);
        let pixel_count = (size as usize) * (size as usize);
        Self {
            width: size,
            height: size,
            pixels: color.repeat(pixel_count),
        }
    }

    /// Check that the pixel buffer matches the dimensions
    pub fn validate(&self) -> BackendResult<()> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.width == 0 || self.height == 0 || self.pixels.len() != expected {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture {}x{} needs {} bytes, got {}",
                self.width,
                self.height,
                expected,
                self.pixels.len()
            )));
        }
        Ok(())
    }
}

/// GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture {
    /// Upload pixel data
    pub fn upload(data: &TextureData, gpu: &mut dyn GraphicsBackend) -> BackendResult<Self> {
        data.validate()?;
        let id = gpu.create_texture(data)?;
        Ok(Self { id, width: data.width, height: data.height })
    }

    /// Backend name
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bind to a texture unit
    pub fn bind(&self, gpu: &mut dyn GraphicsBackend, unit: u32) {
        gpu.bind_texture(unit, Some(self.id));
    }
}

/// Texture filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    /// Nearest texel
    Nearest,
    /// Bilinear
    #[default]
    Linear,
    /// Trilinear between mip levels
    LinearMipmapLinear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    /// Tile
    #[default]
    Repeat,
    /// Tile mirrored
    MirroredRepeat,
    /// Clamp to the edge texel
    ClampToEdge,
}

/// Sampler object parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerParams {
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
    /// Wrapping along U
    pub wrap_s: TextureWrap,
    /// Wrapping along V
    pub wrap_t: TextureWrap,
}

/// GPU sampler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampler {
    id: SamplerId,
    params: SamplerParams,
}

impl Sampler {
    /// Create a sampler object
    pub fn create(params: SamplerParams, gpu: &mut dyn GraphicsBackend) -> BackendResult<Self> {
        let id = gpu.create_sampler(&params)?;
        Ok(Self { id, params })
    }

    /// Backend name
    pub fn id(&self) -> SamplerId {
        self.id
    }

    /// Creation parameters
    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Bind to a texture unit
    pub fn bind(&self, gpu: &mut dyn GraphicsBackend, unit: u32) {
        gpu.bind_sampler(unit, Some(self.id));
    }
}
