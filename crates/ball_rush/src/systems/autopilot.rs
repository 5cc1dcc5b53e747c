//! Scripted input for unattended runs

use rush_engine::ecs::systems::ObstacleRegistry;
use rush_engine::ecs::World;
use rush_engine::foundation::math::{Mat4Ext, Vec3};

use super::player_controller::{find_player, PlayerInput};

/// Dodges the nearest obstacle ahead of the player
///
/// Looks `lookahead` units down -Z. An obstacle whose sphere, widened by
/// `margin`, overlaps the player's lane position is avoided by strafing away
/// from its center, boosting when it is closer than half the lookahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// How far ahead obstacles are considered
    pub lookahead: f32,
    /// Extra clearance added to both radii
    pub margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { lookahead: 8.0, margin: 0.5 }
    }
}

impl Autopilot {
    /// Input for this frame
    pub fn steer(&self, world: &World, obstacles: &ObstacleRegistry) -> PlayerInput {
        let Some((player, _, radius)) = find_player(world) else {
            return PlayerInput::default();
        };
        let Some(center) = world
            .local_to_world_matrix(player)
            .map(|matrix| matrix.transform_point4(&Vec3::zeros()))
        else {
            return PlayerInput::default();
        };

        let threat = obstacles
            .obstacles()
            .iter()
            .filter(|obstacle| {
                let ahead = center.z - obstacle.center.z;
                let clearance = radius + obstacle.radius + self.margin;
                ahead > -clearance && ahead < self.lookahead && (obstacle.center.x - center.x).abs() < clearance
            })
            .min_by(|a, b| (center.z - a.center.z).total_cmp(&(center.z - b.center.z)));

        match threat {
            Some(obstacle) => {
                let distance = center.z - obstacle.center.z;
                let dodge_left = obstacle.center.x >= center.x;
                log::trace!("Autopilot dodging obstacle at {:?}", obstacle.center);
                PlayerInput {
                    left: dodge_left,
                    right: !dodge_left,
                    boost: distance < self.lookahead * 0.5,
                }
            }
            None => PlayerInput::default(),
        }
    }
}
