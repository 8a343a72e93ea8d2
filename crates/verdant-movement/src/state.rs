//! Per-actor movement state and the walk/delay primitives.

use crate::actor::Actor;
use serde::{Deserialize, Serialize};
use verdant_common::{Direction, TileCoord};

/// Frames needed to walk one tile (one pixel per frame over a 16px tile).
pub const WALK_FRAMES_PER_TILE: u8 = 16;

/// Pixel size of one tile.
pub const TILE_PIXELS: i16 = 16;

/// Frames for one jog-in-place stride.
pub const JOG_FRAMES_PER_STRIDE: u8 = 8;

/// Short idle delay table, in frames (~0.5 to ~1.3 seconds at 60fps).
pub const DELAYS_SHORT: [u16; 4] = [32, 48, 64, 80];

/// Medium idle delay table, in frames (~0.5 to ~2.1 seconds at 60fps).
pub const DELAYS_MEDIUM: [u16; 4] = [32, 64, 96, 128];

/// Picks a random entry from a delay table.
#[must_use]
pub fn pick_delay(delays: &[u16], rng: &mut fastrand::Rng) -> u16 {
    delays[rng.usize(..delays.len())]
}

/// Picks a random direction from a direction set.
#[must_use]
pub fn pick_direction(directions: &[Direction], rng: &mut fastrand::Rng) -> Direction {
    directions[rng.usize(..directions.len())]
}

/// The movement state machine record for one actor.
///
/// Exactly one lives per actor being simulated, created lazily on the
/// actor's first tick and dropped on map unload or actor removal. Tile
/// coordinates on the actor are committed the instant a walk begins; the
/// sub-tile offset here carries the remaining visual lag toward zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementState {
    /// Current step id in the handler's state machine
    pub step: u8,
    /// Countdown delay timer in frames
    pub delay_timer: u16,
    /// Facing direction committed to the sprite
    pub facing: Direction,
    /// Direction of the current or pending walk
    pub movement_direction: Direction,
    /// Whether a single movement action is in progress
    pub single_movement_active: bool,
    /// Whether a walk (or walk-in-place) is animating
    pub walking: bool,
    /// Whether the current walk is animation-only (no displacement)
    pub walk_in_place: bool,
    /// Frames the current action takes to complete
    pub cadence: u8,
    /// Progress through the current walk, `0..=cadence`
    pub walk_progress: u8,
    /// Spawn tile anchoring the movement-range fence
    pub anchor: TileCoord,
    /// Horizontal sub-tile offset in pixels
    pub sub_x: i16,
    /// Vertical sub-tile offset in pixels
    pub sub_y: i16,
    /// Leg/sequence index for multi-leg archetypes
    pub sequence_index: u32,
    /// Player facing captured when a copy-player actor first engages
    pub copy_anchor: Option<Direction>,
}

impl MovementState {
    /// Creates the state for an actor, anchored at its current tile.
    #[must_use]
    pub fn new(actor: &Actor, initial_direction: Direction) -> Self {
        Self {
            step: 0,
            delay_timer: 0,
            facing: actor.facing,
            movement_direction: initial_direction,
            single_movement_active: false,
            walking: false,
            walk_in_place: false,
            cadence: WALK_FRAMES_PER_TILE,
            walk_progress: 0,
            anchor: actor.tile,
            sub_x: 0,
            sub_y: 0,
            sequence_index: 0,
            copy_anchor: None,
        }
    }

    /// Commits the facing direction without moving.
    pub fn face(&mut self, direction: Direction) {
        self.facing = direction;
    }

    /// Clears any in-flight movement action and zeroes the sub-tile offset.
    pub fn clear_action(&mut self) {
        self.single_movement_active = false;
        self.walking = false;
        self.walk_in_place = false;
        self.walk_progress = 0;
        self.sub_x = 0;
        self.sub_y = 0;
    }

    /// Commits a one-tile walk.
    ///
    /// The actor's tile coordinates move to the destination immediately; the
    /// sub-tile offset starts at a full tile in the opposite direction and
    /// converges to zero over [`WALK_FRAMES_PER_TILE`] frames, so the logical
    /// position leads the rendered position.
    pub fn begin_walk(&mut self, actor: &mut Actor, direction: Direction) {
        let delta = direction.offset();

        self.movement_direction = direction;
        self.facing = direction;
        self.walking = true;
        self.walk_in_place = false;
        self.cadence = WALK_FRAMES_PER_TILE;
        self.walk_progress = 0;
        self.single_movement_active = true;

        actor.tile = actor.tile.offset(delta);

        self.sub_x = -(delta.dx as i16) * TILE_PIXELS;
        self.sub_y = -(delta.dy as i16) * TILE_PIXELS;
    }

    /// Commits an animation-only step: the walk flag toggles for `cadence`
    /// frames while tile and sub-tile stay put.
    pub fn begin_walk_in_place(&mut self, direction: Direction, cadence: u8) {
        self.movement_direction = direction;
        self.facing = direction;
        self.walking = true;
        self.walk_in_place = true;
        self.cadence = cadence.max(1);
        self.walk_progress = 0;
        self.single_movement_active = true;
        self.sub_x = 0;
        self.sub_y = 0;
    }

    /// Advances a walking actor by one frame.
    ///
    /// Real walks move the sprite one pixel toward the committed tile;
    /// walk-in-place keeps the sub-tile pinned at zero. Either way the
    /// action completes once `walk_progress` reaches the cadence.
    pub fn advance_walk(&mut self) {
        if !self.walking {
            return;
        }

        self.walk_progress = self.walk_progress.saturating_add(1);

        if self.walk_in_place {
            self.sub_x = 0;
            self.sub_y = 0;
        } else {
            let delta = self.movement_direction.offset();
            let remaining = i16::from(WALK_FRAMES_PER_TILE.saturating_sub(self.walk_progress));
            self.sub_x = -(delta.dx as i16) * remaining;
            self.sub_y = -(delta.dy as i16) * remaining;
        }

        if self.walk_progress >= self.cadence {
            self.sub_x = 0;
            self.sub_y = 0;
            self.walk_progress = 0;
            self.walking = false;
            self.walk_in_place = false;
            self.single_movement_active = false;
        }
    }

    /// Arms the countdown delay timer.
    pub fn set_delay(&mut self, frames: u16) {
        self.delay_timer = frames;
    }

    /// Ticks the delay timer down one frame; true once it reaches zero.
    pub fn tick_delay(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        self.delay_timer == 0
    }
}
