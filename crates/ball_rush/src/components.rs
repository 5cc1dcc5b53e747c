//! Game specific components

use rush_engine::ecs::Component;
use rush_engine::foundation::math::Vec3;

/// Marks the entity steered by [`crate::systems::PlayerControllerSystem`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerControllerComponent {
    /// Strafe speed per axis in units per second; only `x` is used
    pub position_sensitivity: Vec3,

    /// Multiplier applied to the sensitivity while boosting
    pub speedup_factor: f32,
}

impl Component for PlayerControllerComponent {}

impl Default for PlayerControllerComponent {
    fn default() -> Self {
        Self {
            position_sensitivity: Vec3::new(3.0, 3.0, 3.0),
            speedup_factor: 5.0,
        }
    }
}

impl PlayerControllerComponent {
    /// Sensitivity in effect for this frame
    pub fn sensitivity(&self, boost: bool) -> Vec3 {
        if boost {
            self.position_sensitivity * self.speedup_factor
        } else {
            self.position_sensitivity
        }
    }
}
