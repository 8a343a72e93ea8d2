//! Fixed four-direction walk cycles.
//!
//! Each `walk_sequence_<d0>_<d1>_<d2>_<d3>` token names a closed loop of
//! four one-tile legs that returns the actor to its spawn tile. The parsed
//! direction list and the derived mid-cycle skip rule are cached per unique
//! token, since many actors share the same sequence.

use crate::actor::Actor;
use crate::collision::Collision;
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::{MovementState, WALK_FRAMES_PER_TILE};
use ahash::AHashMap;
use parking_lot::Mutex;
use verdant_common::Direction;

/// Fallback cycle for malformed tokens.
const DEFAULT_CYCLE: [Direction; 4] = [
    Direction::South,
    Direction::East,
    Direction::North,
    Direction::West,
];

/// Parsed sequence configuration.
#[derive(Debug, Clone, Copy)]
struct SequenceData {
    directions: [Direction; 4],
    /// Sequence index at which the mid-cycle skip applies
    skip_index: u32,
    /// Whether the skip compares the x axis (else y) against the anchor
    skip_checks_x: bool,
}

/// Parses the four-leg direction list from a token.
fn parse_cycle(token: &str) -> [Direction; 4] {
    let Some(rest) = token.strip_prefix("walk_sequence_") else {
        return DEFAULT_CYCLE;
    };
    let directions: Vec<Direction> = rest.split('_').filter_map(Direction::from_token).collect();
    match <[Direction; 4]>::try_from(directions) {
        Ok(cycle) => cycle,
        Err(_) => {
            tracing::debug!(token, "malformed walk sequence token, using default cycle");
            DEFAULT_CYCLE
        }
    }
}

/// Derives the mid-cycle skip rule from a cycle.
///
/// The skip fires at the second entry of the first axis-sharing pair of
/// consecutive legs (the "return leg"), comparing that axis against the
/// spawn anchor: if the actor is already level with its anchor on that axis,
/// the leg is redundant and the index advances past it.
fn derive_skip(directions: &[Direction; 4]) -> (u32, bool) {
    if directions[0].is_horizontal() == directions[1].is_horizontal() {
        (1, directions[1].is_horizontal())
    } else {
        (2, directions[2].is_horizontal())
    }
}

/// Handler for the fixed walk-sequence family.
#[derive(Debug, Default)]
pub struct WalkSequenceHandler {
    cache: Mutex<AHashMap<String, SequenceData>>,
}

impl WalkSequenceHandler {
    /// Creates the handler with an empty parse cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sequence_data(&self, token: &str) -> SequenceData {
        let mut cache = self.cache.lock();
        if let Some(data) = cache.get(token) {
            return *data;
        }
        let directions = parse_cycle(token);
        let (skip_index, skip_checks_x) = derive_skip(&directions);
        let data = SequenceData {
            directions,
            skip_index,
            skip_checks_x,
        };
        cache.insert(token.to_owned(), data);
        data
    }
}

impl MovementHandler for WalkSequenceHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        self.sequence_data(token).directions[0]
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
            // Pick the next leg, apply the skip rule, resolve, commit.
            1 => {
                let data = self.sequence_data(&actor.behavior_token);

                // Cycle complete and back at the anchor: restart from leg 0.
                if state.sequence_index >= 3 && actor.tile == state.anchor {
                    state.sequence_index = 0;
                } else if state.sequence_index > 3 {
                    // Interrupted cycle overran the list; restart anyway.
                    state.sequence_index = 0;
                }

                // Mid-cycle skip: the return leg is redundant when already
                // level with the anchor on its axis.
                if state.sequence_index == data.skip_index {
                    let level = if data.skip_checks_x {
                        actor.tile.x == state.anchor.x
                    } else {
                        actor.tile.y == state.anchor.y
                    };
                    if level {
                        state.sequence_index = data.skip_index + 1;
                    }
                }

                let mut direction = data.directions[state.sequence_index as usize];
                state.face(direction);
                state.movement_direction = direction;

                let mut collision = ctx.collision(actor, state, direction);
                if collision == Collision::OutsideRange {
                    // Fence hit: advance to the next leg and retry once.
                    state.sequence_index += 1;
                    if state.sequence_index <= 3 {
                        direction = data.directions[state.sequence_index as usize];
                        state.face(direction);
                        state.movement_direction = direction;
                        collision = ctx.collision(actor, state, direction);
                    }
                }

                if collision == Collision::None {
                    state.begin_walk(actor, state.movement_direction);
                } else {
                    state.begin_walk_in_place(state.movement_direction, WALK_FRAMES_PER_TILE);
                }
                StepResult::wait(2)
            }
            // Wait out the step, then advance the sequence.
            _ => {
                if state.walking {
                    StepResult::wait(2)
                } else {
                    state.single_movement_active = false;
                    state.sequence_index += 1;
                    StepResult::then(1)
                }
            }
        }
    }
}
