//! Wandering archetypes: free roam and axis-constrained random walks.

use crate::actor::Actor;
use crate::collision::Collision;
use crate::handler::{MovementHandler, StepContext, StepResult};
use crate::state::{pick_delay, pick_direction, MovementState, DELAYS_MEDIUM};
use verdant_common::{Direction, DirectionSet};

/// Derives the allowed walk directions from a behavior token.
///
/// `wander_around` roams all four directions; axis-locked tokens list their
/// pair (`wander_up_and_down`, `wander_left_and_right`, ...).
fn wander_set(token: &str) -> DirectionSet {
    let Some(rest) = token.strip_prefix("wander") else {
        return DirectionSet::all();
    };
    let directions: Vec<Direction> = rest.split('_').filter_map(Direction::from_token).collect();
    if directions.is_empty() {
        DirectionSet::all()
    } else {
        DirectionSet::from_slice(&directions)
    }
}

/// Handler for the wandering family.
///
/// Loops: face, roll a medium delay, count it down, roll a direction from
/// the allowed set, then ask the collision resolver. Any blocked outcome
/// re-enters the facing loop without moving; a clear outcome commits a
/// one-tile walk and waits for the interpolation to finish.
#[derive(Debug, Default)]
pub struct WanderHandler;

impl WanderHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MovementHandler for WanderHandler {
    fn initial_direction(&self, token: &str) -> Direction {
        wander_set(token).first()
    }

    fn execute_step(
        &self,
        actor: &mut Actor,
        state: &mut MovementState,
        ctx: &mut StepContext<'_>,
    ) -> StepResult {
        match state.step {
            // Init: clear any stale action.
            0 => {
                state.clear_action();
                StepResult::then(1)
            }
            // Facing animation frame.
            1 => StepResult::wait(2),
            // Roll the idle delay.
            2 => {
                let delay = pick_delay(&DELAYS_MEDIUM, ctx.rng);
                state.set_delay(delay);
                StepResult::wait(3)
            }
            // Count the delay down.
            3 => {
                if state.tick_delay() {
                    StepResult::then(4)
                } else {
                    StepResult::wait(3)
                }
            }
            // Roll a direction and consult the resolver.
            4 => {
                let directions = wander_set(&actor.behavior_token);
                let direction = pick_direction(directions.as_slice(), ctx.rng);
                state.face(direction);
                state.movement_direction = direction;

                if ctx.collision(actor, state, direction) == Collision::None {
                    StepResult::then(5)
                } else {
                    // Blocked: keep the new facing, loop back to the delay.
                    StepResult::then(1)
                }
            }
            // Commit the walk.
            5 => {
                state.begin_walk(actor, state.movement_direction);
                StepResult::wait(6)
            }
            // Wait out the sub-tile interpolation.
            6 => {
                if state.walking {
                    StepResult::wait(6)
                } else {
                    state.single_movement_active = false;
                    StepResult::then(1)
                }
            }
            _ => {
                state.clear_action();
                StepResult::then(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::OccupancySnapshot;
    use crate::environment::{Environment, GridEnvironment};
    use verdant_common::{ActorId, TileCoord};

    fn run_frames(
        handler: &dyn MovementHandler,
        actor: &mut Actor,
        state: &mut MovementState,
        env: &GridEnvironment,
        rng: &mut fastrand::Rng,
        frames: u32,
    ) {
        for _ in 0..frames {
            if state.walking {
                state.advance_walk();
            }
            let occupancy = OccupancySnapshot::capture(std::slice::from_ref(actor));
            let mut ctx = StepContext {
                env,
                occupancy: &occupancy,
                player: env.player(),
                rng,
            };
            for _ in 0..10 {
                let result = handler.execute_step(actor, state, &mut ctx);
                state.step = result.next_step;
                if !result.continue_immediately {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_wander_set_parsing() {
        assert_eq!(wander_set("wander_around").as_slice(), &Direction::ALL);
        assert_eq!(
            wander_set("wander_up_and_down").as_slice(),
            &[Direction::North, Direction::South]
        );
        assert_eq!(
            wander_set("wander_left_and_right").as_slice(),
            &[Direction::West, Direction::East]
        );
    }

    #[test]
    fn test_wanderer_eventually_moves() {
        let mut actor =
            Actor::new(ActorId::from_raw(1), TileCoord::new(0, 0), "wander_around").with_range(5, 5);
        let mut state = MovementState::new(&actor, Direction::South);
        let env = GridEnvironment::new();
        let mut rng = fastrand::Rng::with_seed(3);
        let handler = WanderHandler::new();

        run_frames(&handler, &mut actor, &mut state, &env, &mut rng, 2000);
        assert_ne!(
            (actor.tile, state.facing),
            (TileCoord::new(0, 0), Direction::South),
            "wanderer should have moved or at least re-faced"
        );
    }

    #[test]
    fn test_boxed_in_wanderer_faces_but_never_moves() {
        let spawn = TileCoord::new(0, 0);
        let mut actor = Actor::new(ActorId::from_raw(1), spawn, "wander_around");
        let mut state = MovementState::new(&actor, Direction::South);

        let mut env = GridEnvironment::new();
        env.block_neighbors(spawn);

        let mut rng = fastrand::Rng::with_seed(11);
        let handler = WanderHandler::new();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..60 {
            run_frames(&handler, &mut actor, &mut state, &env, &mut rng, 130);
            assert_eq!(actor.tile, spawn, "boxed-in wanderer must never move");
            seen.insert(state.facing);
        }
        assert!(seen.len() > 1, "facing should still change while boxed in");
    }

    #[test]
    fn test_axis_locked_wanderer_stays_on_axis() {
        let spawn = TileCoord::new(0, 0);
        let mut actor =
            Actor::new(ActorId::from_raw(1), spawn, "wander_up_and_down").with_range(3, 3);
        let mut state = MovementState::new(&actor, Direction::North);
        let env = GridEnvironment::new();
        let mut rng = fastrand::Rng::with_seed(17);
        let handler = WanderHandler::new();

        for _ in 0..40 {
            run_frames(&handler, &mut actor, &mut state, &env, &mut rng, 200);
            assert_eq!(actor.tile.x, spawn.x, "vertical wanderer left its column");
        }
    }

    #[test]
    fn test_wanderer_respects_range_fence() {
        let spawn = TileCoord::new(10, 10);
        let mut actor =
            Actor::new(ActorId::from_raw(1), spawn, "wander_around").with_range(2, 1);
        let mut state = MovementState::new(&actor, Direction::South);
        let env = GridEnvironment::new();
        let mut rng = fastrand::Rng::with_seed(23);
        let handler = WanderHandler::new();

        for _ in 0..200 {
            run_frames(&handler, &mut actor, &mut state, &env, &mut rng, 50);
            assert!((spawn.x - 2..=spawn.x + 2).contains(&actor.tile.x));
            assert!((spawn.y - 1..=spawn.y + 1).contains(&actor.tile.y));
        }
    }
}
