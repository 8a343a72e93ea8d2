//! Standing archetypes: fixed facing, look-around, and direction subsets.

use crate::actor::Actor;
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::{pick_delay, pick_direction, MovementState, DELAYS_MEDIUM};
use verdant_common::{Direction, DirectionSet};

/// Derives the allowed facing set from a behavior token.
///
/// `look_around` rotates through all four directions; `face_<dirs>` tokens
/// list the allowed directions (`face_down`, `face_down_and_up`,
/// `face_up_left_and_right`, ...). Anything unparseable collapses to a
/// fixed south facing, the subsystem-wide fallback posture.
fn facing_set(token: &str) -> DirectionSet {
    if token == "look_around" {
        return DirectionSet::all();
    }
    let Some(rest) = token.strip_prefix("face_") else {
        return DirectionSet::single(Direction::South);
    };
    let directions: Vec<Direction> = rest.split('_').filter_map(Direction::from_token).collect();
    if directions.is_empty() {
        DirectionSet::single(Direction::South)
    } else {
        DirectionSet::from_slice(&directions)
    }
}

/// Handler for the standing family.
///
/// Single-direction variants commit their facing once and park. Rotating
/// variants loop: commit facing, roll a medium delay, count it down, roll a
/// new direction from the allowed set.
#[derive(Debug, Default)]
pub struct FaceHandler;

impl FaceHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MovementHandler for FaceHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        facing_set(token).first()
    }

    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
    ) -> StepResult {
        let directions = facing_set(&actor.behavior_token);
        match state.step {
            // Init: clear any stale action; fixed variants commit facing now.
            0 => {
                state.clear_action();
                if directions.is_single() {
                    state.face(directions.first());
                }
                StepResult::then(1)
            }
            // Facing animation frame; fixed variants park here.
            1 => {
                if directions.is_single() {
                    StepResult::wait(1)
                } else {
                    StepResult::wait(2)
                }
            }
            // Roll the idle delay.
            2 => {
                state.single_movement_active = false;
                let delay = pick_delay(&DELAYS_MEDIUM, ctx.rng);
                state.set_delay(delay);
                StepResult::wait(3)
            }
            // Count the delay down.
            3 => {
                if state.tick_delay() {
                    StepResult::then(4)
                } else {
                    StepResult::wait(3)
                }
            }
            // Roll a new facing from the allowed set.
            4 => {
                let direction = pick_direction(directions.as_slice(), ctx.rng);
                state.face(direction);
                StepResult::then(1)
            }
            _ => {
                state.clear_action();
                StepResult::then(1)
            }
        }
    }
}
