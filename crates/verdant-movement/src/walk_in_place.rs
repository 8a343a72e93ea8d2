//! Walk-in-place archetypes: stepping animation with no displacement.

use crate::actor::Actor;
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::{MovementState, JOG_FRAMES_PER_STRIDE, WALK_FRAMES_PER_TILE};
use verdant_common::Direction;

/// Derives the fixed facing from a behavior token
/// (`walk_in_place_left`, `jog_in_place_up`, ...).
fn facing(token: &str) -> Direction {
    token
        .rsplit('_')
        .next()
        .and_then(Direction::from_token)
        .unwrap_or(Direction::South)
}

/// Stride length in frames: jog variants step twice as fast.
fn cadence(token: &str) -> u8 {
    if token.starts_with("jog") {
        JOG_FRAMES_PER_STRIDE
    } else {
        WALK_FRAMES_PER_TILE
    }
}

/// Handler for the walk-in-place family.
///
/// The actor never leaves its tile and the sub-tile offset stays pinned at
/// zero; the walking flag toggles once per stride to drive the idle
/// stepping animation.
#[derive(Debug, Default)]
pub struct WalkInPlaceHandler;

impl MovementHandler for WalkInPlaceHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        facing(token)
    }

    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        _ctx: &mut StepContext<'_>,
    ) -> StepResult {
        match state.step {
            // Begin a stride.
            0 => {
                state.clear_action();
                let direction = facing(&actor.behavior_token);
                state.begin_walk_in_place(direction, cadence(&actor.behavior_token));
                StepResult::wait(1)
            }
            // Wait out the stride; rest one frame, then start the next one.
            _ => {
                if state.walking {
                    StepResult::wait(1)
                } else {
                    StepResult::wait(0)
                }
            }
        }
    }
}
