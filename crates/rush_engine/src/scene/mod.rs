//! Scene description and loading
//!
//! A scene file is a serde document holding the asset descriptions and a tree
//! of entity descriptions. [`SceneLoader`] turns the tree into world entities
//! whose mesh renderers point into an already populated
//! [`crate::assets::AssetCache`].

pub mod description;
pub mod loader;

pub use description::{ComponentDescription, EntityDescription, SceneDescription};
pub use loader::SceneLoader;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::ecs::EcsError;

/// Scene loading errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The scene document could not be read or parsed
    #[error("Scene file error: {0}")]
    Config(#[from] ConfigError),

    /// Loading the scene's assets failed
    #[error("Scene asset error: {0}")]
    Asset(#[from] AssetError),

    /// An entity names an asset the cache does not hold
    #[error("Entity '{entity}' references unknown {kind} '{name}'")]
    UnknownAsset {
        /// Entity carrying the reference
        entity: String,
        /// Asset kind
        kind: &'static str,
        /// Referenced name
        name: String,
    },

    /// Building the hierarchy failed
    #[error("Scene hierarchy error: {0}")]
    Ecs(#[from] EcsError),
}
