//! Material system

pub mod material;

pub use material::{
    BaseMaterial, LitMaterial, Material, TexturedMaterial, TintedMaterial, DIFFUSE_TEXTURE_UNIT,
};
