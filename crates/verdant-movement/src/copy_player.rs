//! Copy-player archetypes: mimic the player's steps through a rotation.

use crate::actor::Actor;
use crate::collision::Collision;
use crate::environment::PlayerSnapshot;
use crate::evasion::{self, EvadeQuery};
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::MovementState;
use verdant_common::{Direction, TileCoord};

/// How the player's movement direction maps onto the copier's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Same direction as the player
    Mirror,
    /// Opposite direction
    Reverse,
    /// Quarter turn clockwise
    Clockwise,
    /// Quarter turn counterclockwise
    Counterclockwise,
}

impl CopyMode {
    /// Derives the mode from a behavior token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.contains("counterclockwise") {
            Self::Counterclockwise
        } else if token.contains("clockwise") {
            Self::Clockwise
        } else if token.contains("opposite") {
            Self::Reverse
        } else {
            Self::Mirror
        }
    }

    /// The facing each mode starts from before the player first moves.
    #[must_use]
    pub const fn initial_direction(self) -> Direction {
        match self {
            Self::Mirror => Direction::North,
            Self::Reverse => Direction::South,
            Self::Clockwise => Direction::East,
            Self::Counterclockwise => Direction::West,
        }
    }
}

/// Normalizes the player's movement against the facing they had when the
/// copier first engaged, so the mimicry is relative rather than absolute.
fn normalize(player_anchor: Direction, player_move: Direction) -> Direction {
    match player_anchor {
        Direction::North => player_move,
        Direction::South => player_move.opposite(),
        Direction::West => player_move.rotated_clockwise(),
        Direction::East => player_move.rotated_counterclockwise(),
    }
}

/// Applies the copy mode to the normalized direction.
fn apply_mode(mode: CopyMode, observed: Direction) -> Direction {
    match mode {
        CopyMode::Mirror => observed,
        CopyMode::Reverse => observed.opposite(),
        CopyMode::Clockwise => observed.rotated_clockwise(),
        CopyMode::Counterclockwise => observed.rotated_counterclockwise(),
    }
}

/// Full substitution: anchor normalization composed with the mode rotation.
#[must_use]
pub fn copy_direction(
    mode: CopyMode,
    player_anchor: Direction,
    player_move: Direction,
) -> Direction {
    apply_mode(mode, normalize(player_anchor, player_move))
}

fn requires_grass(token: &str) -> bool {
    token.contains("in_grass")
}

fn is_evasive(token: &str) -> bool {
    token.contains("evasive")
}

/// Handler for the copy-player family.
///
/// Watches the player's step phase; on every frame the player is mid-step,
/// maps the movement through the substitution tables and attempts the same
/// one-tile move (face-only when blocked). The grass-restricted sub-mode
/// additionally requires a grass destination, and the evasive sub-mode
/// replaces the mimic direction with the scripted escort routine.
#[derive(Debug, Default)]
pub struct CopyPlayerHandler {
    escort_pillars: Vec<TileCoord>,
}

impl CopyPlayerHandler {
    /// Creates the handler with no escort pillar data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the handler with pillar tiles for the evasive sub-mode.
    #[must_use]
    pub fn with_escort_pillars(pillars: Vec<TileCoord>) -> Self {
        Self {
            escort_pillars: pillars,
        }
    }

    /// Commits a face-only action: the copier turns but stays put.
    fn face_only(state: &mut MovementState, direction: Direction) -> StepResult {
        state.face(direction);
        state.single_movement_active = true;
        state.walking = false;
        state.walk_in_place = false;
        state.walk_progress = 0;
        state.sub_x = 0;
        state.sub_y = 0;
        StepResult::wait(2)
    }

    /// Attempts the transformed move, falling back to facing when blocked.
    fn attempt_move(
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
        direction: Direction,
        grass_only: bool,
    ) -> StepResult {
        let target = actor.tile.step(direction);

        let blocked = ctx.collision(actor, state, direction) != Collision::None;
        let off_grass = grass_only && !ctx.env.behavior_at(target).is_grass();

        if blocked || off_grass {
            return Self::face_only(state, direction);
        }

        state.begin_walk(actor, direction);
        StepResult::wait(2)
    }

    /// The evasive sub-mode's decision for this player step.
    fn evasive_direction(
        &self,
        actor: &Actor,
        ctx: &StepContext<'_>,
        player: &PlayerSnapshot,
    ) -> Option<Direction> {
        let env = ctx.env;
        let player_dest = player.tile;
        let can_move_to = move |tile: TileCoord| {
            tile != player_dest && env.behavior_at(tile).is_grass()
        };
        evasion::evade_direction(&EvadeQuery {
            step_counter: env.script_counter(),
            player_prev: player.prev_tile,
            player_curr: player.tile,
            actor_tile: actor.tile,
            pillars: &self.escort_pillars,
            can_move_to: &can_move_to,
        })
    }
}

impl MovementHandler for CopyPlayerHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        CopyMode::from_token(token).initial_direction()
    }

    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
    ) -> StepResult {
        match state.step {
            // Init: clear and capture the player's anchor facing.
            0 => {
                state.clear_action();
                if state.copy_anchor.is_none() {
                    if let Some(player) = ctx.player {
                        state.copy_anchor = Some(player.direction);
                    }
                }
                StepResult::then(1)
            }
            // Watch the player and mimic their steps.
            1 => {
                let Some(player) = ctx.player else {
                    return StepResult::wait(1);
                };
                if !player.moving {
                    return StepResult::wait(1);
                }

                let mode = CopyMode::from_token(&actor.behavior_token);
                let grass_only = requires_grass(&actor.behavior_token);
                let evasive = is_evasive(&actor.behavior_token);

                let anchor = state.copy_anchor.unwrap_or(player.direction);
                let transformed = copy_direction(mode, anchor, player.direction);

                if evasive {
                    let counter = ctx.env.script_counter();
                    actor.sprite_hidden = !evasion::visible_on_step(counter);

                    return match self.evasive_direction(actor, ctx, &player) {
                        Some(direction) => {
                            Self::attempt_move(actor, state, ctx, direction, grass_only)
                        }
                        None => Self::face_only(state, transformed),
                    };
                }

                Self::attempt_move(actor, state, ctx, transformed, grass_only)
            }
            // Wait out the committed action.
            _ => {
                if state.walking {
                    StepResult::wait(2)
                } else {
                    state.single_movement_active = false;
                    StepResult::wait(1)
                }
            }
        }
    }
}
