//! System trait definitions

use super::World;

/// Per-frame logic operating on the world
pub trait System {
    /// Advance the system by `delta_time` seconds
    fn update(&mut self, world: &mut World, delta_time: f32);
}
