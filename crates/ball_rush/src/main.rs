//! Ball Rush entry point
//!
//! Usage: `ball_rush [config.ron]`

use std::path::PathBuf;
use std::process::ExitCode;

use ball_rush::config::GameConfig;
use ball_rush::systems::Outcome;
use ball_rush::{GameError, PlayState, RoundSummary};
use rush_engine::foundation::logging;
use rush_engine::prelude::*;

const DEFAULT_CONFIG: &str = "crates/ball_rush/assets/config.ron";

fn run(config_path: PathBuf) -> Result<RoundSummary, GameError> {
    let config = GameConfig::load(&config_path)?;
    logging::init(logging::parse_level(&config.log_level));
    log::info!("Starting Ball Rush with {}", config_path.display());

    let mut engine = Engine::new(config.engine.clone(), Box::new(HeadlessBackend::new()))?;
    let mut game = PlayState::new(config);
    engine.run(&mut game)?;

    Ok(game.summary().unwrap_or(RoundSummary {
        outcome: None,
        score: game.score(),
        frames: engine.frame_count(),
    }))
}

fn main() -> ExitCode {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    match run(config_path) {
        Ok(summary) => {
            match summary.outcome {
                Some(Outcome::Win) => println!("You win! Score: {}", summary.score),
                Some(Outcome::Lose) => println!("You lose! Score: {}", summary.score),
                None => println!("Round unfinished after {} frames. Score: {}", summary.frames, summary.score),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Ball Rush failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
