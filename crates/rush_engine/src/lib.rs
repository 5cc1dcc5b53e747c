//! # Rush Engine
//!
//! A small ECS game engine with a single-pass forward renderer.
//!
//! ## Features
//!
//! - **ECS World**: named entities with a transform, parenting and typed components
//! - **Forward Rendering**: opaque/transparent partition, view-axis transparency
//!   ordering and all scene lights uploaded to every draw
//! - **Layered Materials**: base, tinted, textured and lit material layers
//! - **Asset Cache**: name-indexed, handle-based ownership of GPU resources
//! - **Scene Files**: RON or TOML descriptions of assets and entity trees
//! - **Headless Backend**: a recording [`render::GraphicsBackend`] that runs without a GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rush_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.load_scene("assets/scene.ron")?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_max_frames(60);
//!     let mut engine = Engine::new(config, Box::new(HeadlessBackend::new()))?;
//!     engine.run(&mut MyApp)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod physics;
pub mod assets;
pub mod scene;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application, Engine, EngineError,
        assets::{AssetCache, MaterialHandle, MeshHandle},
        config::Config,
        core::config::{EngineConfig, RendererConfig, TransparentSort},
        ecs::{
            components::{
                CameraComponent, ColliderComponent, ColliderRole, LightComponent, MeshRendererComponent,
                MovementComponent, TransformComponent,
            },
            systems::{MovementSystem, ObstacleRegistry},
            Component, Entity, System, World,
        },
        foundation::math::{IVec2, Mat4, Vec3, Vec4},
        render::{backends::HeadlessBackend, ForwardRenderer, GraphicsBackend},
        scene::SceneLoader,
    };
}
