//! # Ball Rush
//!
//! A ball rolls down a lane along -Z. Strafe left and right to avoid the
//! obstacles; touching one loses the round, reaching the finish line wins it.
//! One point is scored for every stretch of lane passed.

#![warn(missing_docs)]

pub mod components;
pub mod config;
pub mod play_state;
pub mod systems;

use rush_engine::config::ConfigError;
use rush_engine::EngineError;
use thiserror::Error;

pub use play_state::{PlayState, RoundSummary};

/// Top level game errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine failed to start or stopped with an error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}
