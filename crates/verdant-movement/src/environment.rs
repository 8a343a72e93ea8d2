//! Environment query interface supplied by the host.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use verdant_common::{Direction, TileCoord};

/// Terrain classification relevant to movement and ground effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileBehavior {
    /// No special behavior
    #[default]
    Normal,
    /// Tall grass (rustles when stepped into)
    TallGrass,
    /// Long grass (rustles, taller sprite overlap)
    LongGrass,
    /// Sand (footprints)
    Sand,
    /// Deep sand (heavier footprints)
    DeepSand,
}

impl TileBehavior {
    /// Checks if this behavior is a grass type.
    #[must_use]
    pub const fn is_grass(self) -> bool {
        matches!(self, Self::TallGrass | Self::LongGrass)
    }

    /// Checks if this behavior is a sand type.
    #[must_use]
    pub const fn is_sand(self) -> bool {
        matches!(self, Self::Sand | Self::DeepSand)
    }
}

/// A frame-consistent view of the player for collision and mimicry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Committed tile (the destination while mid-step)
    pub tile: TileCoord,
    /// Tile being vacated while mid-step (equals `tile` when idle)
    pub prev_tile: TileCoord,
    /// Current facing/movement direction
    pub direction: Direction,
    /// Whether the player is mid-step this frame
    pub moving: bool,
}

impl PlayerSnapshot {
    /// Creates a stationary snapshot.
    #[must_use]
    pub const fn standing(tile: TileCoord, direction: Direction) -> Self {
        Self {
            tile,
            prev_tile: tile,
            direction,
            moving: false,
        }
    }

    /// Checks whether the player blocks the given tile.
    ///
    /// The player occupies the committed tile and, while mid-step, the tile
    /// still being vacated.
    #[must_use]
    pub fn occupies(&self, tile: TileCoord) -> bool {
        tile == self.tile || (self.moving && tile == self.prev_tile)
    }
}

/// Checks whether two elevations may share a tile.
///
/// Elevation 0 is a universal wildcard; any other pair must match exactly.
#[must_use]
pub const fn elevations_compatible(a: u8, b: u8) -> bool {
    a == 0 || b == 0 || a == b
}

/// Live world queries the movement subsystem needs from the host.
///
/// Implementations must be pure reads: the engine calls these many times per
/// frame and never expects side effects.
pub trait Environment {
    /// Checks if terrain at a tile can be walked on at all.
    fn is_walkable(&self, tile: TileCoord) -> bool;

    /// Returns the elevation layer of a tile.
    fn elevation_at(&self, tile: TileCoord) -> u8 {
        let _ = tile;
        0
    }

    /// Checks if a tile rejects entry from the given approach direction
    /// (one-way ledges and similar).
    fn is_directionally_impassable(&self, tile: TileCoord, approach: Direction) -> bool {
        let _ = (tile, approach);
        false
    }

    /// Returns the terrain classification of a tile.
    fn behavior_at(&self, tile: TileCoord) -> TileBehavior {
        let _ = tile;
        TileBehavior::Normal
    }

    /// Returns the player's state for this frame, if a player exists.
    fn player(&self) -> Option<PlayerSnapshot> {
        None
    }

    /// Returns the host-maintained script step counter (used by scripted
    /// escort behaviors).
    fn script_counter(&self) -> u32 {
        0
    }
}

/// In-memory environment for tests and headless simulation.
#[derive(Debug, Default)]
pub struct GridEnvironment {
    /// Blocked tiles
    blocked: HashSet<TileCoord>,
    /// Elevation overrides (default 0)
    elevations: AHashMap<TileCoord, u8>,
    /// Behavior overrides (default `Normal`)
    behaviors: AHashMap<TileCoord, TileBehavior>,
    /// One-way edges: entry into `.0` is refused when approached moving `.1`
    ledges: HashSet<(TileCoord, Direction)>,
    /// Player state, if any
    player: Option<PlayerSnapshot>,
    /// Script step counter
    script_counter: u32,
}

impl GridEnvironment {
    /// Creates an open, flat environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks a tile.
    pub fn block(&mut self, x: i32, y: i32) {
        self.blocked.insert(TileCoord::new(x, y));
    }

    /// Unblocks a tile.
    pub fn unblock(&mut self, x: i32, y: i32) {
        self.blocked.remove(&TileCoord::new(x, y));
    }

    /// Blocks every neighbor of a tile.
    pub fn block_neighbors(&mut self, tile: TileCoord) {
        for direction in Direction::ALL {
            let neighbor = tile.step(direction);
            self.blocked.insert(neighbor);
        }
    }

    /// Sets a tile's elevation.
    pub fn set_elevation(&mut self, tile: TileCoord, elevation: u8) {
        self.elevations.insert(tile, elevation);
    }

    /// Sets a tile's behavior.
    pub fn set_behavior(&mut self, tile: TileCoord, behavior: TileBehavior) {
        self.behaviors.insert(tile, behavior);
    }

    /// Marks a tile as refusing entry from the given movement direction.
    pub fn set_ledge(&mut self, tile: TileCoord, approach: Direction) {
        self.ledges.insert((tile, approach));
    }

    /// Sets the player snapshot.
    pub fn set_player(&mut self, player: Option<PlayerSnapshot>) {
        self.player = player;
    }

    /// Sets the script step counter.
    pub fn set_script_counter(&mut self, counter: u32) {
        self.script_counter = counter;
    }
}

impl Environment for GridEnvironment {
    fn is_walkable(&self, tile: TileCoord) -> bool {
        !self.blocked.contains(&tile)
    }

    fn elevation_at(&self, tile: TileCoord) -> u8 {
        self.elevations.get(&tile).copied().unwrap_or(0)
    }

    fn is_directionally_impassable(&self, tile: TileCoord, approach: Direction) -> bool {
        self.ledges.contains(&(tile, approach))
    }

    fn behavior_at(&self, tile: TileCoord) -> TileBehavior {
        self.behaviors.get(&tile).copied().unwrap_or_default()
    }

    fn player(&self) -> Option<PlayerSnapshot> {
        self.player
    }

    fn script_counter(&self) -> u32 {
        self.script_counter
    }
}
