//! The movement engine: fixed-frame simulation over live actor records.

use crate::actor::{Actor, SpritePose};
use crate::collision::OccupancySnapshot;
use crate::environment::Environment;
use crate::handler::{HandlerRegistry, StepContext};
use crate::state::MovementState;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use verdant_common::{ActorId, Direction, TileCoord};

/// Duration of one simulated frame at the fixed 60fps rate.
pub const FRAME_DURATION_MS: f32 = 1000.0 / 60.0;

/// Error types for engine operations.
#[derive(Debug, Error)]
pub enum MovementError {
    /// No movement state exists for the actor
    #[error("actor not found: {0:?}")]
    ActorNotFound(ActorId),
}

/// Result type for engine operations.
pub type MovementResult<T> = Result<T, MovementError>;

/// Tunable frame policy for the engine.
///
/// The default discards backlog time and simulates at most one frame per
/// `update` call: under a slow host the simulation runs behind real time but
/// every walk still animates pixel by pixel, which is the deliberate
/// smoothness-over-wall-clock trade-off. Setting `discard_backlog` to false
/// batches catch-up frames instead, bounded by `max_catch_up_frames`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Duration of one simulated frame in milliseconds
    pub frame_duration_ms: f32,
    /// Drop accumulated time beyond one frame instead of catching up
    pub discard_backlog: bool,
    /// Catch-up bound per update when backlog is not discarded
    pub max_catch_up_frames: u32,
    /// Bound on immediate step cascades within one frame
    pub max_cascade_steps: u8,
    /// Seed for the movement RNG; random when absent
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_duration_ms: FRAME_DURATION_MS,
            discard_backlog: true,
            max_catch_up_frames: 10,
            max_cascade_steps: 10,
            rng_seed: None,
        }
    }
}

/// Authoritative per-actor output of one engine update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDelta {
    /// Actor this delta belongs to
    pub actor: ActorId,
    /// Committed tile position
    pub tile: TileCoord,
    /// Horizontal sub-tile offset in pixels
    pub sub_x: i16,
    /// Vertical sub-tile offset in pixels
    pub sub_y: i16,
    /// Facing direction
    pub direction: Direction,
    /// Whether the walk animation is playing
    pub walking: bool,
}

/// Drives every actor's movement state machine at a fixed frame rate.
///
/// Owns the per-actor movement states (created lazily, dropped on reset or
/// removal) and the handler registry. Actors are processed in slice order
/// once per simulated frame against occupancy and player snapshots captured
/// at the top of the frame, so handlers never observe mid-frame mutations of
/// their neighbors.
#[derive(Debug)]
pub struct MovementEngine {
    config: EngineConfig,
    registry: HandlerRegistry,
    states: AHashMap<ActorId, MovementState>,
    accumulator: f32,
    enabled: bool,
    rng: fastrand::Rng,
}

impl Default for MovementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementEngine {
    /// Creates an engine with the default frame policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with an explicit frame policy.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            config,
            registry: HandlerRegistry::with_defaults(),
            states: AHashMap::new(),
            accumulator: 0.0,
            enabled: true,
            rng,
        }
    }

    /// Returns the active frame policy.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access to the handler registry, for host customization.
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Returns an actor's movement state, if it has been initialized.
    #[must_use]
    pub fn state(&self, actor: ActorId) -> Option<&MovementState> {
        self.states.get(&actor)
    }

    /// Number of actors with live movement state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no actor has movement state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Eagerly creates (or re-creates) movement state for an actor.
    ///
    /// Optional: `update` initializes missing states lazily.
    pub fn initialize_actor(&mut self, actor: &Actor) {
        let handler = self.registry.resolve(actor.archetype);
        let initial = handler.initial_direction(&actor.behavior_token);
        self.states
            .insert(actor.id, MovementState::new(actor, initial));
        debug!(actor = actor.id.raw(), token = %actor.behavior_token, "movement state initialized");
    }

    /// Drops an actor's movement state, returning it.
    pub fn remove_actor(&mut self, actor: ActorId) -> MovementResult<MovementState> {
        self.states
            .remove(&actor)
            .ok_or(MovementError::ActorNotFound(actor))
    }

    /// Discards all movement state and pending time (map change).
    pub fn reset(&mut self) {
        self.states.clear();
        self.accumulator = 0.0;
        debug!("movement engine reset");
    }

    /// Enables or disables simulation; disabling drops pending time.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.accumulator = 0.0;
        }
    }

    /// Advances the simulation by elapsed wall-clock time.
    ///
    /// Converts elapsed time into whole simulated frames, runs every visible
    /// actor's handler for each frame, and returns one authoritative delta
    /// per visible actor. Under the default policy at most one frame runs
    /// per call and any backlog is discarded.
    pub fn update(
        &mut self,
        delta_ms: f32,
        actors: &mut [Actor],
        env: &dyn Environment,
    ) -> Vec<PositionDelta> {
        if !self.enabled {
            return Vec::new();
        }

        self.accumulator += delta_ms;
        let frame_ms = self.config.frame_duration_ms.max(0.001);
        let mut frames = (self.accumulator / frame_ms) as u32;

        if frames == 0 {
            return Vec::new();
        }

        if frames > 1 && self.config.discard_backlog {
            // Drop the backlog: one smooth frame beats a teleporting batch.
            frames = 1;
            self.accumulator = 0.0;
        } else {
            frames = frames.min(self.config.max_catch_up_frames);
            self.accumulator -= frames as f32 * frame_ms;
        }

        for _ in 0..frames {
            self.run_frame(actors, env);
        }

        actors
            .iter()
            .filter(|actor| actor.visible)
            .map(|actor| {
                let (sub_x, sub_y, walking) = match self.states.get(&actor.id) {
                    Some(state) => (state.sub_x, state.sub_y, state.walking),
                    None => (0, 0, false),
                };
                PositionDelta {
                    actor: actor.id,
                    tile: actor.tile,
                    sub_x,
                    sub_y,
                    direction: actor.facing,
                    walking,
                }
            })
            .collect()
    }

    /// Simulates one fixed frame for every visible actor.
    fn run_frame(&mut self, actors: &mut [Actor], env: &dyn Environment) {
        let occupancy = OccupancySnapshot::capture(actors);
        let player = env.player();

        for actor in actors.iter_mut() {
            if !actor.visible {
                continue;
            }

            if !self.states.contains_key(&actor.id) {
                self.initialize_actor(actor);
            }
            let Some(state) = self.states.get_mut(&actor.id) else {
                continue;
            };

            if state.walking {
                state.advance_walk();
            }

            let handler = self.registry.resolve(actor.archetype);
            let mut ctx = StepContext {
                env,
                occupancy: &occupancy,
                player,
                rng: &mut self.rng,
            };

            let mut cascades = 0;
            loop {
                let result = handler.execute_step(actor, state, &mut ctx);
                state.step = result.next_step;
                if !result.continue_immediately {
                    break;
                }
                cascades += 1;
                if cascades >= self.config.max_cascade_steps {
                    // Runaway cascade: park until next frame.
                    debug!(actor = actor.id.raw(), "step cascade cap reached");
                    break;
                }
            }

            // The engine owns the render pose; handlers only touch state.
            actor.facing = state.facing;
            actor.pose = SpritePose {
                sub_x: state.sub_x,
                sub_y: state.sub_y,
                walking: state.walking,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ArchetypeTag;
    use crate::environment::GridEnvironment;

    fn seeded_engine() -> MovementEngine {
        MovementEngine::with_config(EngineConfig {
            rng_seed: Some(1234),
            ..EngineConfig::default()
        })
    }

    fn shuttle_actor(raw_id: u64, x: i32, y: i32, token: &str) -> Actor {
        Actor::new(ActorId::from_raw(raw_id), TileCoord::new(x, y), token)
    }

    #[test]
    fn test_update_processes_at_most_one_frame() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(5, 0)];

        // A huge delta still advances exactly one frame: the first frame
        // commits the walk, so sub_x sits at the full tile offset.
        let deltas = engine.update(500.0, &mut actors, &env);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].tile, TileCoord::new(1, 0));
        assert_eq!(deltas[0].sub_x, -16);

        // Backlog was discarded: a zero-ish delta produces no frame.
        let deltas = engine.update(1.0, &mut actors, &env);
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_catch_up_mode_batches_frames() {
        let mut engine = MovementEngine::with_config(EngineConfig {
            discard_backlog: false,
            rng_seed: Some(1),
            ..EngineConfig::default()
        });
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(5, 0)];

        // Three frames' worth: commit plus two interpolation frames.
        let deltas = engine.update(FRAME_DURATION_MS * 3.0, &mut actors, &env);
        assert_eq!(deltas[0].sub_x, -14);
    }

    #[test]
    fn test_sub_tile_decreases_monotonically_to_zero() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(5, 0)];

        let deltas = engine.update(FRAME_DURATION_MS, &mut actors, &env);
        assert_eq!(deltas[0].sub_x.abs(), 16);

        let mut previous = 16;
        for _ in 0..15 {
            let deltas = engine.update(FRAME_DURATION_MS, &mut actors, &env);
            let magnitude = deltas[0].sub_x.abs();
            assert_eq!(magnitude, previous - 1, "one pixel per frame");
            previous = magnitude;
        }

        // Committed tile never changed during interpolation.
        assert_eq!(actors[0].tile, TileCoord::new(1, 0));
    }

    #[test]
    fn test_lazy_state_initialization() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "face_down")];

        assert!(engine.state(actors[0].id).is_none());
        engine.update(FRAME_DURATION_MS, &mut actors, &env);
        assert!(engine.state(actors[0].id).is_some());
    }

    #[test]
    fn test_reset_discards_state() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "face_down")];

        engine.update(FRAME_DURATION_MS, &mut actors, &env);
        assert!(!engine.is_empty());

        engine.reset();
        assert!(engine.is_empty());
    }

    #[test]
    fn test_disabled_engine_produces_nothing() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "wander_around")];

        engine.set_enabled(false);
        let deltas = engine.update(1000.0, &mut actors, &env);
        assert!(deltas.is_empty());

        engine.set_enabled(true);
        let deltas = engine.update(FRAME_DURATION_MS, &mut actors, &env);
        assert_eq!(deltas.len(), 1);
    }

    #[test]
    fn test_remove_actor() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "face_down")];

        engine.update(FRAME_DURATION_MS, &mut actors, &env);
        assert!(engine.remove_actor(actors[0].id).is_ok());
        assert!(matches!(
            engine.remove_actor(actors[0].id),
            Err(MovementError::ActorNotFound(_))
        ));
    }

    #[test]
    fn test_invisible_actor_skipped_but_state_kept() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(5, 0)];

        engine.update(FRAME_DURATION_MS, &mut actors, &env);
        let id = actors[0].id;
        assert!(engine.state(id).is_some());

        actors[0].visible = false;
        let tile_before = actors[0].tile;
        for _ in 0..32 {
            let deltas = engine.update(FRAME_DURATION_MS, &mut actors, &env);
            assert!(deltas.is_empty());
        }
        assert_eq!(actors[0].tile, tile_before);
        assert!(engine.state(id).is_some(), "state survives invisibility");
    }

    #[test]
    fn test_unknown_token_gets_facing_fallback() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "teleport_randomly")];
        assert_eq!(actors[0].archetype, ArchetypeTag::Face);

        for _ in 0..600 {
            engine.update(FRAME_DURATION_MS, &mut actors, &env);
        }
        // Defaulted actor stands still facing south, never crashes.
        assert_eq!(actors[0].tile, TileCoord::new(0, 0));
        assert_eq!(actors[0].facing, Direction::South);
    }

    #[test]
    fn test_adjacent_actors_cannot_swap_tiles() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();

        // Two shuttles aimed at each other in a shared corridor.
        let mut actors = vec![
            shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(3, 0),
            shuttle_actor(2, 3, 0, "walk_left_and_right").with_range(3, 0),
        ];

        for _ in 0..400 {
            engine.update(FRAME_DURATION_MS, &mut actors, &env);
            assert_ne!(actors[0].tile, actors[1].tile, "actors overlapped");
            assert!(
                actors[0].tile.x < actors[1].tile.x,
                "actors passed through each other"
            );
        }
    }

    #[test]
    fn test_range_fence_holds_under_long_simulation() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let spawn = TileCoord::new(50, 50);
        let mut actors =
            vec![Actor::new(ActorId::from_raw(1), spawn, "wander_around").with_range(2, 2)];

        for _ in 0..5000 {
            engine.update(FRAME_DURATION_MS, &mut actors, &env);
            let tile = actors[0].tile;
            assert!((spawn.x - 2..=spawn.x + 2).contains(&tile.x));
            assert!((spawn.y - 2..=spawn.y + 2).contains(&tile.y));
        }
    }

    #[test]
    fn test_pose_mirrors_state() {
        let mut engine = seeded_engine();
        let env = GridEnvironment::new();
        let mut actors = vec![shuttle_actor(1, 0, 0, "walk_right_and_left").with_range(4, 0)];

        engine.update(FRAME_DURATION_MS, &mut actors, &env);
        let state = engine.state(actors[0].id).expect("state exists");
        assert_eq!(actors[0].pose.sub_x, state.sub_x);
        assert_eq!(actors[0].pose.walking, state.walking);
        assert_eq!(actors[0].facing, state.facing);
    }
}
