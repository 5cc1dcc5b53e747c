//! Game configuration
//!
//! Loaded from `assets/config.ron` (or a path given on the command line). A
//! missing file falls back to [`GameConfig::default`].

use std::path::{Path, PathBuf};

use rush_engine::config::{Config, ConfigError};
use rush_engine::core::config::EngineConfig;
use rush_engine::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::PlayerControllerComponent;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine loop and renderer settings
    pub engine: EngineConfig,

    /// Scene document, relative to the configuration file
    pub scene: PathBuf,

    /// Default log level ("error" through "trace"); `RUST_LOG` still applies
    pub log_level: String,

    /// Track rules
    pub track: TrackRules,

    /// Player controller tuning
    pub player: PlayerSettings,

    /// Steer the ball automatically instead of reading input
    pub autopilot: bool,

    /// Stop the engine as soon as the round is decided
    pub exit_on_finish: bool,
}

/// Rules of the lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackRules {
    /// Reaching this z (or beyond, towards -Z) wins the round
    pub finish_line: f32,

    /// The player may not strafe past this distance from the lane center
    pub lane_half_width: f32,

    /// Distance along -Z worth one point
    pub score_interval: f32,

    /// Score cap
    pub max_score: u32,
}

impl Default for TrackRules {
    fn default() -> Self {
        Self {
            finish_line: -50.0,
            lane_half_width: 9.0,
            score_interval: 9.0,
            max_score: 5,
        }
    }
}

impl TrackRules {
    /// Score earned at local depth `z`
    ///
    /// A point is earned for every full interval strictly passed along -Z.
    pub fn score_at(&self, z: f32) -> u32 {
        let passed = (1..=self.max_score)
            .take_while(|&point| {
                #[allow(clippy::cast_precision_loss)]
                let threshold = -(point as f32) * self.score_interval;
                z < threshold
            })
            .count();
        u32::try_from(passed).unwrap_or(self.max_score)
    }
}

/// Player controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Strafe speed per axis, units per second
    pub position_sensitivity: [f32; 3],

    /// Multiplier applied while boosting
    pub speedup_factor: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        let component = PlayerControllerComponent::default();
        Self {
            position_sensitivity: component.position_sensitivity.into(),
            speedup_factor: component.speedup_factor,
        }
    }
}

impl PlayerSettings {
    /// Component attached to the player entity
    pub fn component(&self) -> PlayerControllerComponent {
        PlayerControllerComponent {
            position_sensitivity: Vec3::from(self.position_sensitivity),
            speedup_factor: self.speedup_factor,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            scene: PathBuf::from("ball_rush.ron"),
            log_level: "info".to_string(),
            track: TrackRules::default(),
            player: PlayerSettings::default(),
            autopilot: true,
            exit_on_finish: true,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load and validate, resolving the scene path against the file's directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::load_or_default(path)?;
        if config.scene.is_relative() {
            if let Some(dir) = path.parent() {
                config.scene = dir.join(&config.scene);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        if self.track.lane_half_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "lane_half_width must be positive, got {}",
                self.track.lane_half_width
            )));
        }
        if self.track.score_interval <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "score_interval must be positive, got {}",
                self.track.score_interval
            )));
        }
        Ok(())
    }
}
