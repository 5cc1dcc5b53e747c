//! Game systems

pub mod player_controller;
pub mod autopilot;

pub use player_controller::{Outcome, PlayerControllerSystem, PlayerInput};
pub use autopilot::Autopilot;
