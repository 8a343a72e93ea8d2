//! # Verdant Field
//!
//! Host integration for the Verdant movement subsystem.
//!
//! This crate bridges the engine into a real game loop:
//! - `FieldAdapter` owns the engine, feeds it live environment queries, and
//!   applies its deltas
//! - Ground-effect hooks fire at begin-step (grass rustle, sand footprints,
//!   tire tracks with turn-aware shapes)
//! - TOML-backed configuration for the frame policy and effect toggles

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod field;
pub mod ground_effects;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::field::*;
    pub use crate::ground_effects::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_common::{ActorId, TileCoord};
    use verdant_movement::{Actor, EngineConfig, GridEnvironment, FRAME_DURATION_MS};

    #[test]
    fn test_adapter_round_trip_through_prelude() {
        let mut config = FieldConfig::new();
        config.engine = EngineConfig {
            rng_seed: Some(1),
            ..EngineConfig::default()
        };
        let mut adapter = FieldAdapter::with_config(config);

        let env = GridEnvironment::new();
        let mut actors = vec![Actor::new(
            ActorId::new(),
            TileCoord::new(0, 0),
            "walk_right_and_left",
        )
        .with_range(1, 0)];
        let mut sink = RecordingSink::new();

        for _ in 0..100 {
            let deltas = adapter.update(FRAME_DURATION_MS, &mut actors, &env, &mut sink);
            assert_eq!(deltas.len(), 1);
        }

        // The shuttle stayed inside its one-tile fence the whole time.
        assert!((0..=1).contains(&actors[0].tile.x));
    }
}
