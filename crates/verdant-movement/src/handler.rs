//! Movement handler trait, step context, and the archetype registry.

use crate::actor::{Actor, ArchetypeTag};
use crate::back_and_forth::BackAndForthHandler;
use crate::collision::{collision_at, collision_in_direction, Collision, OccupancySnapshot};
use crate::copy_player::CopyPlayerHandler;
use crate::environment::{Environment, PlayerSnapshot};
use crate::face::FaceHandler;
use crate::state::MovementState;
use crate::walk_in_place::WalkInPlaceHandler;
use crate::walk_sequence::WalkSequenceHandler;
use crate::wander::WanderHandler;
use ahash::AHashMap;
use verdant_common::{Direction, TileCoord};

/// Result of executing one state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Step id to execute next
    pub next_step: u8,
    /// Whether the next step runs within the same simulated frame
    pub continue_immediately: bool,
}

impl StepResult {
    /// Continues to `next_step` within the same frame.
    #[must_use]
    pub const fn then(next_step: u8) -> Self {
        Self {
            next_step,
            continue_immediately: true,
        }
    }

    /// Parks at `next_step` until the next simulated frame.
    #[must_use]
    pub const fn wait(next_step: u8) -> Self {
        Self {
            next_step,
            continue_immediately: false,
        }
    }
}

/// Per-frame context handed to handlers.
///
/// The occupancy and player snapshots are captured once per simulated frame,
/// so every handler running within the frame observes the same world.
pub struct StepContext<'a> {
    /// Host environment queries
    pub env: &'a dyn Environment,
    /// Frame-consistent actor occupancy
    pub occupancy: &'a OccupancySnapshot,
    /// Frame-consistent player state
    pub player: Option<PlayerSnapshot>,
    /// Engine RNG for delay and direction rolls
    pub rng: &'a mut fastrand::Rng,
}

impl StepContext<'_> {
    /// Resolves a one-tile move from the actor's position.
    #[must_use]
    pub fn collision(
        &self,
        actor: &Actor,
        state: &MovementState,
        direction: Direction,
    ) -> Collision {
        collision_in_direction(
            actor,
            state,
            direction,
            self.env,
            self.occupancy,
            self.player.as_ref(),
        )
    }

    /// Resolves a move to a specific tile.
    #[must_use]
    pub fn collision_at(
        &self,
        actor: &Actor,
        state: &MovementState,
        target: TileCoord,
        direction: Direction,
    ) -> Collision {
        collision_at(
            actor,
            state,
            target,
            direction,
            self.env,
            self.occupancy,
            self.player.as_ref(),
        )
    }
}

/// A movement behavior state machine, re-entered once per simulated frame.
pub trait MovementHandler: Send + Sync {
    /// Returns the direction the actor initially moves/faces, derived from
    /// its raw behavior token.
    fn initial_direction(&self, token: &str) -> Direction {
        let _ = token;
        Direction::South
    }

    /// Executes the step identified by `state.step` and reports the next one.
    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
    ) -> StepResult;
}

/// Registry mapping archetype tags to their handlers.
///
/// Hosts may re-register a tag to swap in a customized handler (for example
/// a scripted copy-player variant configured with map-specific data).
pub struct HandlerRegistry {
    handlers: AHashMap<ArchetypeTag, Box<dyn MovementHandler>>,
    fallback: FaceHandler,
}

impl HandlerRegistry {
    /// Creates a registry with the default handler for every archetype.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            handlers: AHashMap::new(),
            fallback: FaceHandler::new(),
        };
        registry.register(ArchetypeTag::Face, Box::new(FaceHandler::new()));
        registry.register(ArchetypeTag::Wander, Box::new(WanderHandler::new()));
        registry.register(ArchetypeTag::BackAndForth, Box::new(BackAndForthHandler));
        registry.register(ArchetypeTag::WalkSequence, Box::new(WalkSequenceHandler::new()));
        registry.register(ArchetypeTag::WalkInPlace, Box::new(WalkInPlaceHandler));
        registry.register(ArchetypeTag::CopyPlayer, Box::new(CopyPlayerHandler::new()));
        registry
    }

    /// Registers (or replaces) the handler for an archetype.
    pub fn register(&mut self, tag: ArchetypeTag, handler: Box<dyn MovementHandler>) {
        self.handlers.insert(tag, handler);
    }

    /// Resolves the handler for an archetype.
    ///
    /// An unregistered tag resolves to the static facing fallback so actor
    /// processing never halts.
    #[must_use]
    pub fn resolve(&self, tag: ArchetypeTag) -> &dyn MovementHandler {
        match self.handlers.get(&tag) {
            Some(handler) => handler.as_ref(),
            None => {
                tracing::debug!(?tag, "no handler registered, using facing fallback");
                &self.fallback
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("tags", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
