//! GPU resources: textures, samplers and materials

pub mod textures;
pub mod materials;

pub use textures::{Sampler, SamplerParams, Texture, TextureData, TextureFilter, TextureWrap};
pub use materials::{BaseMaterial, LitMaterial, Material, TexturedMaterial, TintedMaterial};
