//! Built-in systems

pub mod movement;
pub mod collision;

pub use movement::MovementSystem;
pub use collision::ObstacleRegistry;
