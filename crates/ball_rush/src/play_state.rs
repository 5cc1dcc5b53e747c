//! The playable round

use rush_engine::ecs::components::{ColliderComponent, ColliderRole};
use rush_engine::ecs::systems::{MovementSystem, ObstacleRegistry};
use rush_engine::ecs::System;
use rush_engine::{AppError, Application, Engine};

use crate::config::GameConfig;
use crate::systems::{Autopilot, Outcome, PlayerControllerSystem, PlayerInput};

/// Final state of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    /// How the round ended, `None` if it was cut short
    pub outcome: Option<Outcome>,
    /// Points earned
    pub score: u32,
    /// Frames simulated
    pub frames: u64,
}

/// Loads the scene and runs movement, player control and rendering each frame
pub struct PlayState {
    config: GameConfig,
    obstacles: ObstacleRegistry,
    movement: MovementSystem,
    controller: PlayerControllerSystem,
    autopilot: Option<Autopilot>,
    input: PlayerInput,
    summary: Option<RoundSummary>,
}

impl PlayState {
    /// Create the state; nothing is loaded until the engine initializes it
    pub fn new(config: GameConfig) -> Self {
        let autopilot = config.autopilot.then(Autopilot::default);
        Self {
            controller: PlayerControllerSystem::new(config.track),
            config,
            obstacles: ObstacleRegistry::new(),
            movement: MovementSystem::new(),
            autopilot,
            input: PlayerInput::default(),
            summary: None,
        }
    }

    /// Input used on frames without an autopilot
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.controller.score()
    }

    /// Summary recorded at cleanup
    pub fn summary(&self) -> Option<RoundSummary> {
        self.summary
    }
}

impl Application for PlayState {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.load_scene(&self.config.scene)?;

        let player = engine
            .world
            .query::<ColliderComponent>()
            .find(|(_, collider)| collider.role == ColliderRole::Player)
            .map(|(entity, _)| entity)
            .ok_or_else(|| AppError::GameLogic("scene has no player collider".to_string()))?;
        engine
            .world
            .add_component(player, self.config.player.component())
            .map_err(|e| AppError::GameLogic(e.to_string()))?;

        self.obstacles = ObstacleRegistry::from_world(&engine.world);
        log::info!(
            "Round ready: {} obstacles, finish line at z = {}",
            self.obstacles.len(),
            self.config.track.finish_line
        );
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        self.movement.update(&mut engine.world, delta_time);

        let input = match self.autopilot {
            Some(autopilot) => autopilot.steer(&engine.world, &self.obstacles),
            None => self.input,
        };
        let was_finished = self.controller.is_finished();
        let stopped = self
            .controller
            .update(&mut engine.world, delta_time, input, &self.obstacles, &mut self.movement);

        if stopped && !was_finished {
            match self.controller.outcome() {
                Some(Outcome::Win) => log::info!("You win! Score: {}", self.controller.score()),
                Some(Outcome::Lose) => log::info!("You lose! Score: {}", self.controller.score()),
                None => {}
            }
            if self.config.exit_on_finish {
                engine.request_exit();
            }
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let summary = RoundSummary {
            outcome: self.controller.outcome(),
            score: self.controller.score(),
            frames: engine.frame_count(),
        };
        log::info!("Round summary: {:?}", summary);
        self.summary = Some(summary);
    }
}
