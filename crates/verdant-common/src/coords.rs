//! Integer coordinate types for the tile grid.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};

/// A tile coordinate on the overworld grid.
///
/// The y axis grows southward (screen-down), matching sprite space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// X coordinate in tiles
    pub x: i32,
    /// Y coordinate in tiles
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate displaced by a delta.
    #[must_use]
    pub const fn offset(self, delta: TileDelta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }

    /// Returns the neighboring coordinate one tile in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction.offset())
    }

    /// Returns the delta from this coordinate to another.
    #[must_use]
    pub const fn delta_to(self, other: Self) -> TileDelta {
        TileDelta {
            dx: other.x - self.x,
            dy: other.y - self.y,
        }
    }
}

/// A displacement between two tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileDelta {
    /// X displacement in tiles
    pub dx: i32,
    /// Y displacement in tiles
    pub dy: i32,
}

impl TileDelta {
    /// Zero displacement.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Creates a new delta.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Returns the negated delta.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_step_south_grows_y() {
        let origin = TileCoord::new(10, 10);
        assert_eq!(origin.step(Direction::South), TileCoord::new(10, 11));
        assert_eq!(origin.step(Direction::North), TileCoord::new(10, 9));
        assert_eq!(origin.step(Direction::West), TileCoord::new(9, 10));
        assert_eq!(origin.step(Direction::East), TileCoord::new(11, 10));
    }

    #[test]
    fn test_delta_to_inverse_of_offset() {
        let a = TileCoord::new(3, -4);
        let b = TileCoord::new(-1, 7);
        assert_eq!(a.offset(a.delta_to(b)), b);
    }

    proptest! {
        #[test]
        fn prop_step_then_opposite_returns(x in -1000i32..1000, y in -1000i32..1000, dir in 0usize..4) {
            let direction = Direction::ALL[dir];
            let origin = TileCoord::new(x, y);
            prop_assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }

        #[test]
        fn prop_offset_negated_roundtrip(x in -1000i32..1000, y in -1000i32..1000, dx in -5i32..5, dy in -5i32..5) {
            let origin = TileCoord::new(x, y);
            let delta = TileDelta::new(dx, dy);
            prop_assert_eq!(origin.offset(delta).offset(delta.negated()), origin);
        }
    }
}
