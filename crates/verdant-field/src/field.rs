//! The field adapter: bridges the movement engine into the host loop.

use crate::config::FieldConfig;
use crate::ground_effects::{track_shape, GrassKind, GroundEffectSink};
use ahash::AHashMap;
use tracing::debug;
use verdant_common::{ActorId, Direction};
use verdant_movement::{
    Actor, Environment, MovementEngine, MovementResult, MovementState, MoverKind, PositionDelta,
    TileBehavior, TILE_PIXELS,
};

/// Owns the movement engine and applies its output to the host world.
///
/// Each host tick flows one way: the adapter feeds live environment queries
/// into the engine, the engine mutates actor records and emits deltas, and
/// the adapter fires ground-effect hooks for every step that begins. A step
/// begins on exactly the frame its sub-tile offset sits at the full tile
/// magnitude, so back-to-back legs each trigger their own effects.
#[derive(Debug)]
pub struct FieldAdapter {
    config: FieldConfig,
    engine: MovementEngine,
    /// Heading of each actor's previous stride, for track bends
    last_heading: AHashMap<ActorId, Direction>,
}

impl Default for FieldAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldAdapter {
    /// Creates an adapter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FieldConfig::new())
    }

    /// Creates an adapter with an explicit configuration.
    #[must_use]
    pub fn with_config(config: FieldConfig) -> Self {
        let engine = MovementEngine::with_config(config.engine.clone());
        Self {
            config,
            engine,
            last_heading: AHashMap::new(),
        }
    }

    /// The underlying movement engine.
    #[must_use]
    pub fn engine(&self) -> &MovementEngine {
        &self.engine
    }

    /// Mutable engine access, for handler re-registration.
    pub fn engine_mut(&mut self) -> &mut MovementEngine {
        &mut self.engine
    }

    /// Returns an actor's movement state, if initialized.
    #[must_use]
    pub fn state(&self, actor: ActorId) -> Option<&MovementState> {
        self.engine.state(actor)
    }

    /// Eagerly initializes movement state for an actor.
    pub fn initialize_actor(&mut self, actor: &Actor) {
        self.engine.initialize_actor(actor);
    }

    /// Drops an actor's movement state and effect tracking.
    pub fn remove_actor(&mut self, actor: ActorId) -> MovementResult<MovementState> {
        self.last_heading.remove(&actor);
        self.engine.remove_actor(actor)
    }

    /// Discards all per-actor state (map change).
    pub fn reset(&mut self) {
        self.engine.reset();
        self.last_heading.clear();
        debug!("field adapter reset");
    }

    /// Enables or disables the simulation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.engine.set_enabled(enabled);
    }

    /// Advances the simulation and fires ground effects for begun steps.
    ///
    /// Returns the engine's authoritative deltas for the renderer.
    pub fn update(
        &mut self,
        delta_ms: f32,
        actors: &mut [Actor],
        env: &dyn Environment,
        sink: &mut dyn GroundEffectSink,
    ) -> Vec<PositionDelta> {
        let deltas = self.engine.update(delta_ms, actors, env);

        if self.config.ground_effects {
            for delta in &deltas {
                let began_step = delta.walking
                    && (delta.sub_x.abs() == TILE_PIXELS || delta.sub_y.abs() == TILE_PIXELS);
                if !began_step {
                    continue;
                }
                if let Some(actor) = actors.iter().find(|actor| actor.id == delta.actor) {
                    self.trigger_step_effects(actor, delta, env, sink);
                }
            }
        }

        deltas
    }

    /// Seeds skip-animation grass effects for actors standing in grass.
    ///
    /// Call once after actors are loaded for a map.
    pub fn seed_spawn_effects(
        &self,
        actors: &[Actor],
        env: &dyn Environment,
        sink: &mut dyn GroundEffectSink,
    ) {
        if !self.config.spawn_grass_effects {
            return;
        }
        for actor in actors.iter().filter(|actor| actor.visible) {
            match env.behavior_at(actor.tile) {
                TileBehavior::TallGrass => {
                    sink.grass_rustle(actor.tile, GrassKind::Tall, actor.id, true);
                }
                TileBehavior::LongGrass => {
                    sink.grass_rustle(actor.tile, GrassKind::Long, actor.id, true);
                }
                _ => {}
            }
        }
    }

    /// Fires the effects for one begun step: grass at the destination,
    /// footprints or tire tracks at the tile just vacated.
    fn trigger_step_effects(
        &mut self,
        actor: &Actor,
        delta: &PositionDelta,
        env: &dyn Environment,
        sink: &mut dyn GroundEffectSink,
    ) {
        match env.behavior_at(delta.tile) {
            TileBehavior::TallGrass => {
                sink.grass_rustle(delta.tile, GrassKind::Tall, actor.id, false);
            }
            TileBehavior::LongGrass => {
                sink.grass_rustle(delta.tile, GrassKind::Long, actor.id, false);
            }
            _ => {}
        }

        if let Some(vacated) = actor.vacating_tile() {
            let behavior = env.behavior_at(vacated);
            if behavior.is_sand() {
                match actor.kind {
                    MoverKind::OnFoot => {
                        sink.sand_footprint(
                            vacated,
                            delta.direction,
                            behavior == TileBehavior::DeepSand,
                            actor.id,
                        );
                    }
                    MoverKind::Wheeled => {
                        let previous = self
                            .last_heading
                            .get(&actor.id)
                            .copied()
                            .unwrap_or(delta.direction);
                        sink.tire_track(vacated, track_shape(previous, delta.direction), actor.id);
                    }
                }
            }
        }

        self.last_heading.insert(actor.id, delta.direction);
    }
}
