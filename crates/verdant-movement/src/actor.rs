//! Actor records and behavior archetype tags.

use serde::{Deserialize, Serialize};
use verdant_common::{ActorId, Direction, TileCoord};

/// The closed set of movement behavior families.
///
/// Each tag selects a handler from the registry; sub-variants (direction
/// subsets, rotation modes, cadences) are re-derived by the handler from the
/// actor's raw behavior token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeTag {
    /// Stand still facing one or more directions (fixed, look-around, subsets)
    Face,
    /// Random one-tile walks inside the movement range (free or axis-locked)
    Wander,
    /// Two opposite legs, returning to spawn between them
    BackAndForth,
    /// Fixed four-direction closed walk cycle
    WalkSequence,
    /// Animation-only stepping with no displacement
    WalkInPlace,
    /// Mimic the player's movement through a rotation mode
    CopyPlayer,
}

impl ArchetypeTag {
    /// Derives the archetype family from a raw behavior token.
    ///
    /// Unknown tokens fall back to [`ArchetypeTag::Face`]; a misconfigured
    /// actor stands still rather than halting the simulation.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.starts_with("wander") {
            Self::Wander
        } else if token.contains("in_place") {
            Self::WalkInPlace
        } else if token.starts_with("walk_sequence_") {
            Self::WalkSequence
        } else if matches!(
            token,
            "walk_up_and_down" | "walk_down_and_up" | "walk_left_and_right" | "walk_right_and_left"
        ) {
            Self::BackAndForth
        } else if token.starts_with("copy_player") {
            Self::CopyPlayer
        } else {
            if !token.starts_with("face_") && token != "look_around" {
                tracing::debug!(token, "unknown behavior token, falling back to face");
            }
            Self::Face
        }
    }
}

/// How an actor physically moves, for ground-effect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoverKind {
    /// Walks on foot; leaves footprints in sand
    #[default]
    OnFoot,
    /// Rolls on wheels; leaves tire tracks with bend shapes on turns
    Wheeled,
}

/// Render-facing animation state for an actor sprite.
///
/// Written only by the movement engine and field adapter; the renderer reads
/// a copy each frame and never writes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritePose {
    /// Horizontal sub-tile offset in pixels (negative while lagging behind
    /// the committed tile)
    pub sub_x: i16,
    /// Vertical sub-tile offset in pixels
    pub sub_y: i16,
    /// Whether the walk animation is playing
    pub walking: bool,
}

/// An autonomous grid-bound actor (NPC, scripted creature, mover).
///
/// Owned by the host's actor registry. The movement subsystem updates tile
/// position and pose in place each simulated frame; it never creates or
/// destroys actors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique actor identity
    pub id: ActorId,
    /// Committed tile position (leads the rendered position while walking)
    pub tile: TileCoord,
    /// Elevation layer; 0 is compatible with every elevation
    pub elevation: u8,
    /// Current facing for rendering
    pub facing: Direction,
    /// Behavior family tag derived from the token
    pub archetype: ArchetypeTag,
    /// Raw behavior token from map data (e.g. `walk_sequence_up_right_left_down`)
    pub behavior_token: String,
    /// Movement range fence half-width in tiles; 0 = unbounded on that axis
    pub range_x: u16,
    /// Movement range fence half-height in tiles; 0 = unbounded
    pub range_y: u16,
    /// Whether the actor participates in simulation and collision
    pub visible: bool,
    /// Whether the sprite is hidden while the actor stays live
    pub sprite_hidden: bool,
    /// On foot or wheeled, for ground effects
    pub kind: MoverKind,
    /// Render interpolation state
    pub pose: SpritePose,
}

impl Actor {
    /// Creates a new actor at a spawn tile with the given behavior token.
    #[must_use]
    pub fn new(id: ActorId, tile: TileCoord, behavior_token: &str) -> Self {
        Self {
            id,
            tile,
            elevation: 0,
            facing: Direction::South,
            archetype: ArchetypeTag::from_token(behavior_token),
            behavior_token: behavior_token.to_owned(),
            range_x: 0,
            range_y: 0,
            visible: true,
            sprite_hidden: false,
            kind: MoverKind::OnFoot,
            pose: SpritePose::default(),
        }
    }

    /// Sets the movement range fence.
    #[must_use]
    pub const fn with_range(mut self, range_x: u16, range_y: u16) -> Self {
        self.range_x = range_x;
        self.range_y = range_y;
        self
    }

    /// Sets the elevation layer.
    #[must_use]
    pub const fn with_elevation(mut self, elevation: u8) -> Self {
        self.elevation = elevation;
        self
    }

    /// Sets the initial facing direction.
    #[must_use]
    pub const fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }

    /// Sets the mover kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: MoverKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks whether the actor is mid-step (pose lagging the committed tile).
    #[must_use]
    pub const fn is_mid_step(&self) -> bool {
        self.pose.walking && (self.pose.sub_x != 0 || self.pose.sub_y != 0)
    }

    /// Returns the tile the actor is visually vacating while mid-step.
    ///
    /// The committed tile already points at the destination, so the vacating
    /// tile sits one step back along the sign of the sub-tile offset.
    #[must_use]
    pub fn vacating_tile(&self) -> Option<TileCoord> {
        if !self.is_mid_step() {
            return None;
        }
        let prev = TileCoord::new(
            self.tile.x + i32::from(self.pose.sub_x.signum()),
            self.tile.y + i32::from(self.pose.sub_y.signum()),
        );
        (prev != self.tile).then_some(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_from_token() {
        assert_eq!(ArchetypeTag::from_token("wander_around"), ArchetypeTag::Wander);
        assert_eq!(
            ArchetypeTag::from_token("wander_up_and_down"),
            ArchetypeTag::Wander
        );
        assert_eq!(
            ArchetypeTag::from_token("walk_up_and_down"),
            ArchetypeTag::BackAndForth
        );
        assert_eq!(
            ArchetypeTag::from_token("walk_sequence_up_right_left_down"),
            ArchetypeTag::WalkSequence
        );
        assert_eq!(
            ArchetypeTag::from_token("walk_in_place_right"),
            ArchetypeTag::WalkInPlace
        );
        assert_eq!(
            ArchetypeTag::from_token("jog_in_place_up"),
            ArchetypeTag::WalkInPlace
        );
        assert_eq!(
            ArchetypeTag::from_token("copy_player_clockwise"),
            ArchetypeTag::CopyPlayer
        );
        assert_eq!(ArchetypeTag::from_token("face_down"), ArchetypeTag::Face);
        assert_eq!(ArchetypeTag::from_token("look_around"), ArchetypeTag::Face);
    }

    #[test]
    fn test_unknown_token_falls_back_to_face() {
        assert_eq!(ArchetypeTag::from_token("moonwalk"), ArchetypeTag::Face);
        assert_eq!(ArchetypeTag::from_token(""), ArchetypeTag::Face);
    }

    #[test]
    fn test_actor_builders() {
        let actor = Actor::new(ActorId::from_raw(1), TileCoord::new(5, 5), "wander_around")
            .with_range(2, 3)
            .with_elevation(4)
            .with_facing(Direction::East)
            .with_kind(MoverKind::Wheeled);

        assert_eq!(actor.archetype, ArchetypeTag::Wander);
        assert_eq!(actor.range_x, 2);
        assert_eq!(actor.range_y, 3);
        assert_eq!(actor.elevation, 4);
        assert_eq!(actor.facing, Direction::East);
        assert_eq!(actor.kind, MoverKind::Wheeled);
        assert!(actor.visible);
        assert!(!actor.sprite_hidden);
    }

    #[test]
    fn test_vacating_tile_while_mid_step() {
        let mut actor = Actor::new(ActorId::from_raw(1), TileCoord::new(3, 3), "wander_around");
        assert_eq!(actor.vacating_tile(), None);

        // Walking east: committed tile is the destination, sprite lags west.
        actor.tile = TileCoord::new(4, 3);
        actor.pose.walking = true;
        actor.pose.sub_x = -12;
        assert_eq!(actor.vacating_tile(), Some(TileCoord::new(3, 3)));
    }

    #[test]
    fn test_vacating_tile_none_when_settled() {
        let mut actor = Actor::new(ActorId::from_raw(1), TileCoord::new(3, 3), "face_down");
        actor.pose.walking = true;
        actor.pose.sub_x = 0;
        actor.pose.sub_y = 0;
        assert_eq!(actor.vacating_tile(), None);
    }
}
