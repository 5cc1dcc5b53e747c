//! Core engine implementation

use std::path::Path;

use thiserror::Error;

use crate::application::{AppError, Application};
use crate::assets::AssetCache;
use crate::core::config::EngineConfig;
use crate::ecs::{Entity, World};
use crate::foundation::math::IVec2;
use crate::render::{ForwardRenderer, GraphicsBackend, RenderError};
use crate::scene::{SceneError, SceneLoader};

/// Main engine struct
///
/// Owns the world, the asset cache, the forward renderer and the graphics
/// backend, and runs the fixed-timestep loop.
pub struct Engine {
    /// ECS world containing all entities and components
    pub world: World,

    /// Owner of every GPU resource
    pub assets: AssetCache,

    /// Forward renderer
    pub renderer: ForwardRenderer,

    backend: Box<dyn GraphicsBackend>,
    config: EngineConfig,
    frame: u64,
    running: bool,
}

impl Engine {
    /// Create a new engine drawing through `backend`
    pub fn new(config: EngineConfig, backend: Box<dyn GraphicsBackend>) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        log::info!(
            "Initializing engine: {}x{} framebuffer, {:.4}s timestep",
            config.framebuffer_size.0,
            config.framebuffer_size.1,
            config.fixed_timestep
        );

        Ok(Self {
            world: World::new(),
            assets: AssetCache::new(),
            renderer: ForwardRenderer::new(config.renderer.clone()),
            backend,
            config,
            frame: 0,
            running: false,
        })
    }

    /// Run the main loop with the given application
    ///
    /// Stops when the application calls [`Engine::request_exit`], when
    /// `max_frames` frames have run, or on the first error. Cleanup runs in
    /// every case.
    pub fn run<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        let result = self.main_loop(app);

        app.cleanup(self);
        self.assets.clear(self.backend.as_mut());
        log::info!("Engine shutdown complete after {} frames", self.frame);

        result
    }

    fn main_loop<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        app.initialize(self)?;
        self.running = true;

        log::info!("Starting main loop...");
        let delta_time = self.config.fixed_timestep;
        while self.running {
            if self.config.max_frames.is_some_and(|max| self.frame >= max) {
                log::info!("Frame limit of {} reached", self.frame);
                break;
            }
            app.update(self, delta_time)?;
            app.render(self)?;
            self.frame += 1;
        }
        self.running = false;
        Ok(())
    }

    /// Render the world into the full framebuffer
    pub fn render(&mut self) -> Result<(), RenderError> {
        let viewport = self.viewport_size();
        self.renderer
            .render(&self.world, &self.assets, self.backend.as_mut(), IVec2::zeros(), viewport)
    }

    /// Load a scene file into the world and the asset cache
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<Vec<Entity>, SceneError> {
        SceneLoader::load(path, &mut self.world, &mut self.assets, self.backend.as_mut())
    }

    /// Request engine shutdown after the current frame
    pub fn request_exit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Framebuffer size in pixels
    pub fn viewport_size(&self) -> IVec2 {
        IVec2::new(self.config.framebuffer_size.0, self.config.framebuffer_size.1)
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The graphics backend
    pub fn backend(&self) -> &dyn GraphicsBackend {
        self.backend.as_ref()
    }

    /// Mutable access to the graphics backend, e.g. to upload assets
    pub fn backend_mut(&mut self) -> &mut dyn GraphicsBackend {
        self.backend.as_mut()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration failed validation
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The application returned an error
    #[error("Application error: {0}")]
    Application(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{CameraComponent, MeshRendererComponent};
    use crate::render::backends::HeadlessBackend;
    use crate::render::resources::{BaseMaterial, Material};
    use crate::render::{Mesh, MeshData, PipelineState, ShaderProgram, ShaderSources};

    #[derive(Default)]
    struct Counter {
        initialized: bool,
        updates: u32,
        exit_after: Option<u32>,
        cleaned_up: bool,
        assets_at_cleanup: usize,
    }

    impl Application for Counter {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let gpu = engine.backend_mut();
            let program = ShaderProgram::create(&ShaderSources::new("v", "f"), gpu)?;
            let mesh = Mesh::upload(&MeshData::quad(), gpu)?;
            let shader = engine.assets.add_shader("flat", program)?;
            let mesh = engine.assets.add_mesh("quad", mesh)?;
            let material = engine
                .assets
                .add_material("plain", Material::Base(BaseMaterial::new(shader, PipelineState::default(), false)))?;

            let camera = engine.world.create_entity("camera");
            engine.world.add_component(camera, CameraComponent::default()).unwrap();
            let quad = engine.world.create_entity("quad");
            engine.world.add_component(quad, MeshRendererComponent::new(mesh, material)).unwrap();

            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            self.updates += 1;
            if self.exit_after == Some(self.updates) {
                engine.request_exit();
            }
            Ok(())
        }

        fn cleanup(&mut self, engine: &mut Engine) {
            self.cleaned_up = true;
            self.assets_at_cleanup = engine.assets.len();
        }
    }

    fn engine(max_frames: u64) -> Engine {
        let config = EngineConfig::default().with_max_frames(max_frames);
        Engine::new(config, Box::new(HeadlessBackend::new())).unwrap()
    }

    #[test]
    fn test_runs_until_frame_limit() {
        let mut engine = engine(5);
        let mut app = Counter::default();

        engine.run(&mut app).unwrap();

        assert!(app.initialized);
        assert_eq!(app.updates, 5);
        assert_eq!(engine.frame_count(), 5);
        assert_eq!(engine.renderer.last_frame().opaque_draws, 1);
    }

    #[test]
    fn test_exit_request_stops_loop() {
        let mut engine = engine(100);
        let mut app = Counter { exit_after: Some(3), ..Counter::default() };

        engine.run(&mut app).unwrap();

        assert_eq!(app.updates, 3);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_cleanup_runs_and_assets_are_released() {
        let mut engine = engine(1);
        let mut app = Counter::default();

        engine.run(&mut app).unwrap();

        assert!(app.cleaned_up);
        assert_eq!(app.assets_at_cleanup, 3);
        assert!(engine.assets.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_fixed_timestep(0.0);
        let result = Engine::new(config, Box::new(HeadlessBackend::new()));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
