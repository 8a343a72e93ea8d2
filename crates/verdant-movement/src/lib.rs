//! # Verdant Movement
//!
//! Tile-grid NPC movement and collision for Project Verdant.
//!
//! This crate reproduces the movement behavior of a fixed-60fps overworld
//! engine inside a variable-timestep host:
//! - Per-actor movement state machines, one handler per behavior archetype
//! - Five-outcome collision resolution (range fence, terrain, ledges,
//!   elevation, occupancy)
//! - A fixed-frame engine that favors smooth per-tile animation over strict
//!   real-time catch-up
//! - Pluggable environment queries supplied by the host

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod back_and_forth;
pub mod collision;
pub mod copy_player;
pub mod engine;
pub mod environment;
pub mod evasion;
pub mod face;
pub mod handler;
pub mod state;
pub mod walk_in_place;
pub mod walk_sequence;
pub mod wander;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::collision::*;
    pub use crate::engine::*;
    pub use crate::environment::*;
    pub use crate::handler::*;
    pub use crate::state::*;
}

pub use prelude::*;
