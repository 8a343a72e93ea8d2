//! Cardinal direction vocabulary for tile-grid movement.

use crate::coords::TileDelta;
use serde::{Deserialize, Serialize};

/// A cardinal facing/movement direction on the tile grid.
///
/// The variant order (south, north, west, east) is the canonical indexing
/// order for direction-keyed tables; see [`Direction::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Facing down the screen (+y)
    South,
    /// Facing up the screen (-y)
    North,
    /// Facing left (-x)
    West,
    /// Facing right (+x)
    East,
}

impl Direction {
    /// All four directions in canonical table order.
    pub const ALL: [Self; 4] = [Self::South, Self::North, Self::West, Self::East];

    /// The vertical pair (south first).
    pub const VERTICAL: [Self; 2] = [Self::South, Self::North];

    /// The horizontal pair (west first).
    pub const HORIZONTAL: [Self; 2] = [Self::West, Self::East];

    /// Returns the one-tile displacement for this direction.
    #[must_use]
    pub const fn offset(self) -> TileDelta {
        match self {
            Self::South => TileDelta::new(0, 1),
            Self::North => TileDelta::new(0, -1),
            Self::West => TileDelta::new(-1, 0),
            Self::East => TileDelta::new(1, 0),
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::South => Self::North,
            Self::North => Self::South,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Returns the direction a quarter turn clockwise.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Returns the direction a quarter turn counterclockwise.
    #[must_use]
    pub const fn rotated_counterclockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Checks if this direction lies on the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::West | Self::East)
    }

    /// Returns the canonical table index (south 0, north 1, west 2, east 3).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::South => 0,
            Self::North => 1,
            Self::West => 2,
            Self::East => 3,
        }
    }

    /// Parses a lowercase configuration token (`"up"`, `"down"`, `"left"`,
    /// `"right"`) into a direction.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "down" => Some(Self::South),
            "up" => Some(Self::North),
            "left" => Some(Self::West),
            "right" => Some(Self::East),
            _ => None,
        }
    }
}

/// A small ordered set of up to four distinct directions.
///
/// Used for archetype configuration (allowed facing/wander directions);
/// copyable and allocation-free so handlers can derive it per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSet {
    directions: [Direction; 4],
    len: u8,
}

impl DirectionSet {
    /// The set of all four directions in canonical order.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            directions: Direction::ALL,
            len: 4,
        }
    }

    /// A single-direction set.
    #[must_use]
    pub const fn single(direction: Direction) -> Self {
        Self {
            directions: [direction; 4],
            len: 1,
        }
    }

    /// Builds a set from the first four directions of a slice.
    ///
    /// Duplicates are kept; an empty slice yields the full set.
    #[must_use]
    pub fn from_slice(directions: &[Direction]) -> Self {
        if directions.is_empty() {
            return Self::all();
        }
        let mut set = Self {
            directions: [directions[0]; 4],
            len: 0,
        };
        for &direction in directions.iter().take(4) {
            set.directions[set.len as usize] = direction;
            set.len += 1;
        }
        set
    }

    /// Returns the contained directions.
    #[must_use]
    pub fn as_slice(&self) -> &[Direction] {
        &self.directions[..self.len as usize]
    }

    /// Returns the first direction in the set.
    #[must_use]
    pub const fn first(&self) -> Direction {
        self.directions[0]
    }

    /// Returns the number of directions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Checks whether the set is a single direction.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.len == 1
    }

    /// Always false; sets carry at least one direction.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
