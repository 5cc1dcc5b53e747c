//! Asset management
//!
//! The [`AssetCache`] is the single owner of every GPU resource the game uses:
//! shader programs, meshes, textures, samplers and materials. Everything else
//! (components, materials referencing textures, render commands) holds
//! [`TypedHandle`]s that resolve through the cache.
//!
//! Population is explicit ([`AssetCache::load_descriptions`] or the `add_*`
//! methods) and so is teardown ([`AssetCache::clear`]).

pub mod cache;
pub mod descriptions;

pub use cache::AssetCache;
pub use descriptions::{
    AssetDescriptions, MaterialDescription, MaterialKind, MeshDescription, ShaderDescription, TextureDescription,
};

use crate::foundation::collections::TypedHandle;
use crate::render::primitives::{Mesh, ShaderProgram};
use crate::render::resources::{Material, Sampler, Texture};
use crate::render::RenderError;

/// Handle to a shader program in the cache
pub type ShaderHandle = TypedHandle<ShaderProgram>;

/// Handle to a mesh in the cache
pub type MeshHandle = TypedHandle<Mesh>;

/// Handle to a texture in the cache
pub type TextureHandle = TypedHandle<Texture>;

/// Handle to a sampler in the cache
pub type SamplerHandle = TypedHandle<Sampler>;

/// Handle to a material in the cache
pub type MaterialHandle = TypedHandle<Material>;

/// Asset loading and lookup errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// An asset with this name already exists
    #[error("Duplicate {kind} asset '{name}'")]
    Duplicate {
        /// Asset kind
        kind: &'static str,
        /// Asset name
        name: String,
    },

    /// A description refers to an asset that was never loaded
    #[error("Unknown {kind} '{name}' referenced")]
    UnknownReference {
        /// Asset kind
        kind: &'static str,
        /// Referenced name
        name: String,
    },

    /// Loading one asset failed
    #[error("Failed to load {kind} '{name}': {reason}")]
    LoadFailed {
        /// Asset kind
        kind: &'static str,
        /// Asset name
        name: String,
        /// Cause
        reason: String,
    },

    /// The backend refused to create a resource
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
