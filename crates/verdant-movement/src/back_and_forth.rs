//! Back-and-forth archetype: two opposite legs anchored at spawn.

use crate::actor::Actor;
use crate::collision::Collision;
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::{MovementState, WALK_FRAMES_PER_TILE};
use verdant_common::Direction;

/// Derives the first-leg direction from a behavior token.
fn initial_leg(token: &str) -> Direction {
    match token {
        "walk_right_and_left" => Direction::East,
        "walk_left_and_right" => Direction::West,
        "walk_down_and_up" => Direction::South,
        "walk_up_and_down" => Direction::North,
        _ => Direction::West,
    }
}

/// Handler for the back-and-forth family.
///
/// The sequence index doubles as a leg marker: zero means the outbound leg,
/// non-zero the return leg. Returning to the exact spawn tile resets to the
/// outbound leg. An `OutsideRange` result flips to the opposite direction
/// and retries within the same tick; any remaining blocked outcome walks in
/// place instead of idling.
#[derive(Debug, Default)]
pub struct BackAndForthHandler;

impl MovementHandler for BackAndForthHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        initial_leg(token)
    }

    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
    ) -> StepResult {
        match state.step {
            // Init: clear action and interpolation.
            0 => {
                state.clear_action();
                StepResult::then(1)
            }
            // Face along the current leg.
            1 => {
                let outbound = initial_leg(&actor.behavior_token);
                let direction = if state.sequence_index == 0 {
                    outbound
                } else {
                    outbound.opposite()
                };
                state.face(direction);
                state.movement_direction = direction;
                StepResult::then(2)
            }
            // Resolve and commit the step.
            2 => {
                // Back at spawn after a return leg: restart the outbound leg.
                if state.sequence_index != 0 && actor.tile == state.anchor {
                    state.sequence_index = 0;
                    let direction = state.movement_direction.opposite();
                    state.face(direction);
                    state.movement_direction = direction;
                }

                let mut collision = ctx.collision(actor, state, state.movement_direction);
                if collision == Collision::OutsideRange {
                    // Hit the fence: reverse and retry within this tick.
                    state.sequence_index += 1;
                    let reversed = state.movement_direction.opposite();
                    state.face(reversed);
                    state.movement_direction = reversed;
                    collision = ctx.collision(actor, state, reversed);
                }

                if collision == Collision::None {
                    state.begin_walk(actor, state.movement_direction);
                } else {
                    state.begin_walk_in_place(state.movement_direction, WALK_FRAMES_PER_TILE);
                }
                StepResult::wait(3)
            }
            // Wait for the step to finish.
            _ => {
                if state.walking {
                    StepResult::wait(3)
                } else {
                    state.single_movement_active = false;
                    StepResult::then(1)
                }
            }
        }
    }
}
