//! Ground-effect vocabulary and the tire-track transition table.

use serde::{Deserialize, Serialize};
use verdant_common::{ActorId, Direction, TileCoord};

/// Which grass sprite family rustles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrassKind {
    /// Waist-high grass
    Tall,
    /// Head-high grass
    Long,
}

/// Track sprite left behind by a wheeled mover.
///
/// Straight shapes are keyed by travel direction; bends by the pair of tile
/// edges the track connects, so a turn picks the bend joining the edge it
/// entered through with the edge it left through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackShape {
    /// Straight track heading south
    SouthBound,
    /// Straight track heading north
    NorthBound,
    /// Straight track heading west
    WestBound,
    /// Straight track heading east
    EastBound,
    /// Bend joining the south and east edges
    BendSouthEast,
    /// Bend joining the south and west edges
    BendSouthWest,
    /// Bend joining the north and west edges
    BendNorthWest,
    /// Bend joining the north and east edges
    BendNorthEast,
}

/// Transition table keyed by `[previous direction][next direction]` in
/// canonical order (south, north, west, east).
const TRACK_TRANSITIONS: [[TrackShape; 4]; 4] = [
    [
        TrackShape::SouthBound,
        TrackShape::NorthBound,
        TrackShape::BendNorthWest,
        TrackShape::BendNorthEast,
    ],
    [
        TrackShape::SouthBound,
        TrackShape::NorthBound,
        TrackShape::BendSouthWest,
        TrackShape::BendSouthEast,
    ],
    [
        TrackShape::BendSouthEast,
        TrackShape::BendNorthEast,
        TrackShape::WestBound,
        TrackShape::EastBound,
    ],
    [
        TrackShape::BendSouthWest,
        TrackShape::BendNorthWest,
        TrackShape::WestBound,
        TrackShape::EastBound,
    ],
];

/// Selects the track shape for a stride from `previous` heading to `next`.
#[must_use]
pub const fn track_shape(previous: Direction, next: Direction) -> TrackShape {
    TRACK_TRANSITIONS[previous.index()][next.index()]
}

/// Receiver for ground effects triggered by actor movement.
///
/// Implemented by the host's effect layer; the adapter calls these at the
/// instant a step begins.
pub trait GroundEffectSink {
    /// Grass rustles at the tile an actor is stepping onto (or spawning on,
    /// with `skip_animation` set).
    fn grass_rustle(&mut self, tile: TileCoord, kind: GrassKind, owner: ActorId, skip_animation: bool);

    /// A footprint appears on the sand tile just vacated.
    fn sand_footprint(&mut self, tile: TileCoord, direction: Direction, deep: bool, owner: ActorId);

    /// A tire track appears on the sand tile just vacated.
    fn tire_track(&mut self, tile: TileCoord, shape: TrackShape, owner: ActorId);
}

/// Recorded effect call, for tests and headless hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEffect {
    /// Grass rustle record
    Grass {
        /// Affected tile
        tile: TileCoord,
        /// Grass family
        kind: GrassKind,
        /// Triggering actor
        owner: ActorId,
        /// Spawn-seeded (animation skipped)
        skip_animation: bool,
    },
    /// Sand footprint record
    Footprint {
        /// Affected tile
        tile: TileCoord,
        /// Travel direction
        direction: Direction,
        /// Deep-sand variant
        deep: bool,
        /// Triggering actor
        owner: ActorId,
    },
    /// Tire track record
    Track {
        /// Affected tile
        tile: TileCoord,
        /// Selected shape
        shape: TrackShape,
        /// Triggering actor
        owner: ActorId,
    },
}

/// Sink that records every effect call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// All recorded effects in call order
    pub effects: Vec<RecordedEffect>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GroundEffectSink for RecordingSink {
    fn grass_rustle(&mut self, tile: TileCoord, kind: GrassKind, owner: ActorId, skip_animation: bool) {
        self.effects.push(RecordedEffect::Grass {
            tile,
            kind,
            owner,
            skip_animation,
        });
    }

    fn sand_footprint(&mut self, tile: TileCoord, direction: Direction, deep: bool, owner: ActorId) {
        self.effects.push(RecordedEffect::Footprint {
            tile,
            direction,
            deep,
            owner,
        });
    }

    fn tire_track(&mut self, tile: TileCoord, shape: TrackShape, owner: ActorId) {
        self.effects.push(RecordedEffect::Track { tile, shape, owner });
    }
}
