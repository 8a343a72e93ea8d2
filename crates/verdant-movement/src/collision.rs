//! Collision resolution for prospective single-tile moves.

use crate::actor::Actor;
use crate::environment::{elevations_compatible, Environment, PlayerSnapshot};
use crate::state::MovementState;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use verdant_common::{ActorId, Direction, TileCoord};

/// Outcome of checking a prospective one-tile move.
///
/// Callers branch differently on each variant, so this is never collapsed to
/// a boolean: `OutsideRange` advances sequence archetypes, `Impassable`
/// triggers walk-in-place, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collision {
    /// The move is permitted
    None,
    /// Target tile lies outside the spawn-anchored movement range
    OutsideRange,
    /// Terrain is not walkable, or entry from this direction is refused
    Impassable,
    /// Actor and target tile elevations are incompatible
    ElevationMismatch,
    /// Another actor or the player occupies the target tile
    ObjectEvent,
}

/// Frame-consistent record of which tiles actors occupy.
///
/// Captured once per simulated frame before any handler runs, so every
/// collision check within the frame sees the same occupancy and two actors
/// can never swap tiles in a single frame. Mid-step actors occupy both their
/// committed tile and the tile they are still vacating.
#[derive(Debug, Default)]
pub struct OccupancySnapshot {
    tiles: AHashMap<TileCoord, Vec<ActorId>>,
}

impl OccupancySnapshot {
    /// Captures occupancy from the live actor slice.
    ///
    /// Invisible actors do not block movement but keep their state, matching
    /// the lifecycle rules for hidden actors.
    #[must_use]
    pub fn capture(actors: &[Actor]) -> Self {
        let mut tiles: AHashMap<TileCoord, Vec<ActorId>> = AHashMap::new();
        for actor in actors {
            if !actor.visible {
                continue;
            }
            tiles.entry(actor.tile).or_default().push(actor.id);
            if let Some(vacating) = actor.vacating_tile() {
                tiles.entry(vacating).or_default().push(actor.id);
            }
        }
        Self { tiles }
    }

    /// Checks whether any actor other than `exclude` occupies the tile.
    #[must_use]
    pub fn occupied_by_other(&self, tile: TileCoord, exclude: ActorId) -> bool {
        self.tiles
            .get(&tile)
            .is_some_and(|ids| ids.iter().any(|&id| id != exclude))
    }
}

/// Checks whether a coordinate falls outside the actor's movement range.
///
/// The fence is a rectangle of half-extents (`range_x`, `range_y`) anchored
/// at the spawn tile; a zero extent leaves that axis unbounded.
#[must_use]
pub fn outside_movement_range(actor: &Actor, state: &MovementState, target: TileCoord) -> bool {
    if actor.range_x != 0 {
        let left = state.anchor.x - i32::from(actor.range_x);
        let right = state.anchor.x + i32::from(actor.range_x);
        if target.x < left || target.x > right {
            return true;
        }
    }

    if actor.range_y != 0 {
        let top = state.anchor.y - i32::from(actor.range_y);
        let bottom = state.anchor.y + i32::from(actor.range_y);
        if target.y < top || target.y > bottom {
            return true;
        }
    }

    false
}

/// Resolves a prospective move one tile from the actor's position.
#[must_use]
pub fn collision_in_direction(
    actor: &Actor,
    state: &MovementState,
    direction: Direction,
    env: &dyn Environment,
    occupancy: &OccupancySnapshot,
    player: Option<&PlayerSnapshot>,
) -> Collision {
    let target = actor.tile.step(direction);
    collision_at(actor, state, target, direction, env, occupancy, player)
}

/// Resolves a prospective move to a specific tile.
///
/// Checks apply in fixed precedence and the first failure wins:
/// range fence, terrain, directional impassability, elevation, actor
/// occupancy, player occupancy. Pure: no state is mutated.
#[must_use]
pub fn collision_at(
    actor: &Actor,
    state: &MovementState,
    target: TileCoord,
    direction: Direction,
    env: &dyn Environment,
    occupancy: &OccupancySnapshot,
    player: Option<&PlayerSnapshot>,
) -> Collision {
    if outside_movement_range(actor, state, target) {
        return Collision::OutsideRange;
    }

    if !env.is_walkable(target) {
        return Collision::Impassable;
    }

    if env.is_directionally_impassable(target, direction) {
        return Collision::Impassable;
    }

    if !elevations_compatible(actor.elevation, env.elevation_at(target)) {
        return Collision::ElevationMismatch;
    }

    if occupancy.occupied_by_other(target, actor.id) {
        return Collision::ObjectEvent;
    }

    if player.is_some_and(|p| p.occupies(target)) {
        return Collision::ObjectEvent;
    }

    Collision::None
}
