//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::engine::Engine;
use crate::render::RenderError;
use crate::scene::SceneError;

/// Application lifecycle trait
///
/// Implement this trait to drive a game with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Load the scene and set up game
    /// state here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Advance the simulation by one fixed step
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Fixed timestep in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the frame
    ///
    /// Called after update. The default draws the world with the engine's
    /// forward renderer.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()?;
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Always called once the loop ends, whether it ended normally or with an
    /// error. The engine clears its asset cache afterwards.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Rendering failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Scene loading failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Asset loading failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
