//! # Engine Configuration
//!
//! Configuration for the renderer and the engine loop. Both are serde types and
//! can be embedded in an application configuration file (TOML or RON).

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Ordering rule applied to transparent render commands
///
/// Both rules order by the projection of each command's world-space center on
/// the camera forward axis; they differ only in direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransparentSort {
    /// A precedes B when `(B.center - A.center) . forward > 0`
    ///
    /// Commands nearer along the viewing axis are submitted first.
    #[default]
    ViewAxisAscending,
    /// A precedes B when `(B.center - A.center) . forward < 0`
    ///
    /// Commands farther along the viewing axis are submitted first.
    ViewAxisDescending,
}

/// # Renderer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Ordering rule for transparent commands
    pub transparent_sort: TransparentSort,
    /// Optional cap on lights packed into the per-draw uniform array
    ///
    /// `None` uploads every light in the scene.
    pub max_lights: Option<usize>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            transparent_sort: TransparentSort::default(),
            max_lights: None,
        }
    }
}

impl RendererConfig {
    /// Set the transparent sort rule
    pub fn with_transparent_sort(mut self, sort: TransparentSort) -> Self {
        self.transparent_sort = sort;
        self
    }

    /// Cap the light array
    pub fn with_max_lights(mut self, max_lights: usize) -> Self {
        self.max_lights = Some(max_lights);
        self
    }

    /// Validate renderer settings
    pub fn validate(&self) -> Result<(), String> {
        if self.max_lights == Some(0) {
            return Err("max_lights must be at least 1".to_string());
        }
        Ok(())
    }
}

/// # Engine Configuration
///
/// Drives the fixed-timestep loop in [`crate::Engine::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Framebuffer size in pixels (width, height)
    pub framebuffer_size: (i32, i32),
    /// Simulation step in seconds
    pub fixed_timestep: f32,
    /// Stop after this many frames; `None` runs until the application exits
    pub max_frames: Option<u64>,
    /// Renderer settings
    pub renderer: RendererConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            framebuffer_size: (1280, 720),
            fixed_timestep: 1.0 / 60.0,
            max_frames: None,
            renderer: RendererConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Set the framebuffer size
    pub fn with_framebuffer_size(mut self, width: i32, height: i32) -> Self {
        self.framebuffer_size = (width, height);
        self
    }

    /// Set the fixed timestep
    pub fn with_fixed_timestep(mut self, seconds: f32) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    /// Limit the number of simulated frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set the renderer configuration
    pub fn with_renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let (width, height) = self.framebuffer_size;
        if width <= 0 || height <= 0 {
            return Err(format!("framebuffer size must be positive, got {}x{}", width, height));
        }
        if !(self.fixed_timestep > 0.0) {
            return Err(format!("fixed_timestep must be positive, got {}", self.fixed_timestep));
        }
        self.renderer.validate()
    }
}
