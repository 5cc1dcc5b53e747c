//! Player control, scoring and round outcome

use rush_engine::ecs::components::{ColliderComponent, ColliderRole};
use rush_engine::ecs::systems::{MovementSystem, ObstacleRegistry};
use rush_engine::ecs::{Entity, World};
use rush_engine::foundation::math::{Mat4Ext, Vec3};

use crate::components::PlayerControllerComponent;
use crate::config::TrackRules;

/// Controls held during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInput {
    /// Strafe towards local -X
    pub left: bool,
    /// Strafe towards local +X
    pub right: bool,
    /// Multiply strafe speed by the controller's speedup factor
    pub boost: bool,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Crossed the finish line
    Win,
    /// Hit an obstacle
    Lose,
}

/// Steers the player and decides the round
///
/// The player is the first entity, in creation order, carrying both a
/// player-role collider and a [`PlayerControllerComponent`].
#[derive(Debug, Clone)]
pub struct PlayerControllerSystem {
    rules: TrackRules,
    score: u32,
    outcome: Option<Outcome>,
}

impl PlayerControllerSystem {
    /// Create a controller for the given track
    pub fn new(rules: TrackRules) -> Self {
        Self { rules, score: 0, outcome: None }
    }

    /// Points earned so far
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Result of the round, once decided
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the round is over
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance one frame; returns true once the round is over
    ///
    /// A collision ends the round as a loss, reaching the finish line as a
    /// win. Either way `movement` is halted. While the round runs the score
    /// follows the distance travelled and the player strafes along its local
    /// +X axis, never leaving the lane.
    pub fn update(
        &mut self,
        world: &mut World,
        delta_time: f32,
        input: PlayerInput,
        obstacles: &ObstacleRegistry,
        movement: &mut MovementSystem,
    ) -> bool {
        if self.is_finished() {
            return true;
        }
        let Some((player, controller, radius)) = find_player(world) else {
            return false;
        };
        let (Some(local_to_world), Some(transform)) =
            (world.local_to_world_matrix(player), world.transform(player).copied())
        else {
            return false;
        };

        let center = local_to_world.transform_point4(&Vec3::zeros());
        let collided = obstacles.is_collision(radius, center);
        if collided || transform.position.z <= self.rules.finish_line {
            let outcome = if collided { Outcome::Lose } else { Outcome::Win };
            log::info!("Round over: {:?} with score {}", outcome, self.score);
            self.outcome = Some(outcome);
            movement.halt();
            return true;
        }

        self.score = self.score.max(self.rules.score_at(transform.position.z));

        let step = transform.right() * (delta_time * controller.sensitivity(input.boost).x);
        let mut position = transform.position;
        if input.right {
            let candidate = position + step;
            if candidate.x <= self.rules.lane_half_width {
                position = candidate;
            }
        }
        if input.left {
            let candidate = position - step;
            if candidate.x >= -self.rules.lane_half_width {
                position = candidate;
            }
        }
        if let Some(transform) = world.transform_mut(player) {
            transform.position = position;
        }
        false
    }
}

/// The controlled entity, its controller and its collider radius
pub fn find_player(world: &World) -> Option<(Entity, PlayerControllerComponent, f32)> {
    world.query::<ColliderComponent>().find_map(|(entity, collider)| {
        if collider.role != ColliderRole::Player {
            return None;
        }
        world
            .get_component::<PlayerControllerComponent>(entity)
            .map(|controller| (entity, *controller, collider.radius))
    })
}
