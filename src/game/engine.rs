use tracing::{debug, info, trace};

use super::{
    Millis,
    action::Direction,
    config::GameConfig,
    effects::{Effect, EffectRegistry},
    grid::Grid,
    spawner::Spawner,
    state::{GameState, SessionStatus, Snake},
};

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Power-ups collected by the head this tick
    pub picked_up: Vec<Effect>,
    /// Power-up spawned as a bonus for eating
    pub spawned_power_up: Option<Effect>,
    /// Power-ups that timed out on the board
    pub expired_power_ups: usize,
    /// Effects whose timers lapsed during this tick
    pub expired_effects: Vec<Effect>,
    /// The snake hit itself and the session is over
    pub game_over: bool,
    /// Delay until the next tick, `None` once the game is over or when
    /// nothing ran
    pub next_delay: Option<Millis>,
}

/// The tick engine that handles all game logic
pub struct TickEngine {
    config: GameConfig,
    spawner: Spawner,
}

impl TickEngine {
    /// Create a new tick engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let spawner = Spawner::from_config(&config);
        Self { config, spawner }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the opening board: a horizontal snake centred on the grid facing
    /// right, food, and one short-lived power-up.
    pub fn reset(&mut self, now: Millis) -> GameState {
        let grid = Grid::new(self.config.grid_width, self.config.grid_height);
        let snake = Snake::new(
            grid.center(),
            Direction::Right,
            self.config.initial_snake_length,
            &grid,
        );

        let head = snake.head();
        let mut state = GameState::new(snake, head, grid);
        state.food = self.spawner.spawn_food(&state);
        self.spawner
            .try_spawn_power_up(&mut state, &self.config, now, true);

        state
    }

    /// Execute one tick of the game.
    ///
    /// Only a running state is advanced; anything else is left untouched.
    pub fn step(
        &mut self,
        state: &mut GameState,
        pending: Option<Direction>,
        now: Millis,
    ) -> TickOutcome {
        if !state.is_running() {
            return TickOutcome::default();
        }

        let mut outcome = TickOutcome {
            expired_effects: state.effects.tick(now),
            ..Default::default()
        };

        // Reverse turns never commit
        if let Some(direction) = pending {
            if !state.snake.direction.is_opposite(direction) {
                state.snake.direction = direction;
            }
        }

        let candidate = state
            .grid
            .wrap(state.snake.head().moved_in_direction(state.snake.direction));
        let ate_food = candidate == state.food;

        // The tail only vacates its cell when the snake is not growing
        if !state.effects.is_active(Effect::Ghost) && state.snake.would_collide(candidate, !ate_food)
        {
            state.status = SessionStatus::Ended;
            outcome.game_over = true;
            info!(score = state.score, ticks = state.ticks, "snake hit itself");
            return outcome;
        }

        state.snake.push_head(candidate);

        if ate_food {
            state.score += if state.effects.is_active(Effect::DoubleScore) {
                2
            } else {
                1
            };
            state.food = self.spawner.spawn_food(state);

            if self.spawner.roll(self.config.power_up_spawn_chance) {
                outcome.spawned_power_up = self
                    .spawner
                    .try_spawn_power_up(state, &self.config, now, false)
                    .map(|p| p.kind);
            }
        } else {
            state.snake.pop_tail();
        }
        outcome.ate_food = ate_food;

        let mut picked_up = Vec::new();
        let before = state.power_ups.len();
        state.power_ups.retain(|power_up| {
            if power_up.position == candidate {
                picked_up.push(power_up.kind);
                false
            } else {
                !power_up.is_expired(now)
            }
        });
        outcome.expired_power_ups = before - state.power_ups.len() - picked_up.len();

        for &kind in &picked_up {
            self.apply_power_up(state, kind, now);
        }
        outcome.picked_up = picked_up;

        outcome.expired_effects.extend(state.effects.tick(now));
        for effect in &outcome.expired_effects {
            debug!(?effect, "effect expired");
        }

        state.ticks += 1;

        let delay = self.tick_delay(&state.effects);
        outcome.next_delay = Some(delay);
        trace!(
            tick = state.ticks,
            score = state.score,
            len = state.snake.len(),
            delay,
            "tick"
        );

        outcome
    }

    /// Delay before the next tick under the given effects.
    ///
    /// Slow wins over speed boost when both are active.
    pub fn tick_delay(&self, effects: &EffectRegistry) -> Millis {
        if effects.is_active(Effect::Slow) {
            self.config.slow_delay_ms
        } else if effects.is_active(Effect::SpeedBoost) {
            let boosted = self.config.base_delay_ms as f64 / self.config.speed_boost_factor;
            (boosted.round() as Millis).max(1)
        } else {
            self.config.base_delay_ms
        }
    }

    /// Current speed relative to the base tick rate
    pub fn speed_multiplier(&self, effects: &EffectRegistry) -> f64 {
        self.config.base_delay_ms as f64 / self.tick_delay(effects) as f64
    }

    fn apply_power_up(&mut self, state: &mut GameState, kind: Effect, now: Millis) {
        if kind == Effect::Shrink {
            let removed = state
                .snake
                .shrink(self.config.shrink_cut, self.config.min_snake_length);
            debug!(removed, len = state.snake.len(), "shrink applied");
        }

        state
            .effects
            .apply(kind, self.config.effect_duration(kind), now);
        debug!(?kind, "power-up collected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Position, PowerUp};

    fn engine() -> TickEngine {
        TickEngine::new(GameConfig::small().with_seed(7))
    }

    fn running(snake: Snake, food: Position) -> GameState {
        let mut state = GameState::new(snake, food, Grid::new(10, 10));
        state.status = SessionStatus::Running;
        state
    }

    fn line(head: Position, direction: Direction, length: usize) -> Snake {
        Snake::new(head, direction, length, &Grid::new(10, 10))
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset(0);

        assert_eq!(state.status, SessionStatus::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(!state.is_occupied_by_snake(state.food));
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].expires_at, 12_000);
        assert_eq!(state.effects.active().count(), 0);
    }

    #[test]
    fn test_not_running_state_is_untouched() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        let before = state.clone();

        let outcome = engine.step(&mut state, None, 100);

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_basic_movement_with_wrap() {
        let mut engine = engine();
        let mut state = running(line(Position::new(9, 5), Direction::Right, 4), Position::new(0, 0));

        let outcome = engine.step(&mut state, None, 100);

        assert!(!outcome.game_over);
        assert!(!outcome.ate_food);
        assert_eq!(state.snake.head(), Position::new(0, 5));
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.ticks, 1);
        assert_eq!(outcome.next_delay, Some(120));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(6, 5));

        let outcome = engine.step(&mut state, None, 100);

        assert!(outcome.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 5);
        assert_ne!(state.food, Position::new(6, 5));
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_double_score_food() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(6, 5));
        state.effects.apply(Effect::DoubleScore, 8000, 0);

        engine.step(&mut state, None, 100);

        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 5), Position::new(8, 8));

        engine.step(&mut state, None, 0);
        engine.step(&mut state, Some(Direction::Down), 0);
        engine.step(&mut state, Some(Direction::Left), 0);
        let frozen = state.snake.clone();
        let outcome = engine.step(&mut state, Some(Direction::Up), 0);

        assert!(outcome.game_over);
        assert_eq!(outcome.next_delay, None);
        assert_eq!(state.status, SessionStatus::Ended);
        assert_eq!(state.snake.body, frozen.body);
        assert_eq!(state.ticks, 3);
    }

    #[test]
    fn test_chasing_the_tail_is_safe() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(8, 8));

        engine.step(&mut state, None, 0);
        engine.step(&mut state, Some(Direction::Down), 0);
        engine.step(&mut state, Some(Direction::Left), 0);
        let outcome = engine.step(&mut state, Some(Direction::Up), 0);

        assert!(!outcome.game_over);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_ghost_passes_through_body() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 5), Position::new(8, 8));
        state.effects.apply(Effect::Ghost, 8000, 0);

        engine.step(&mut state, None, 0);
        engine.step(&mut state, Some(Direction::Down), 0);
        engine.step(&mut state, Some(Direction::Left), 0);
        let outcome = engine.step(&mut state, Some(Direction::Up), 0);

        assert!(!outcome.game_over);
        assert_eq!(state.status, SessionStatus::Running);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.len(), 5);
    }

    #[test]
    fn test_ghost_expiring_before_move_still_kills() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 5), Position::new(8, 8));
        state.effects.apply(Effect::Ghost, 100, 0);

        engine.step(&mut state, None, 10);
        engine.step(&mut state, Some(Direction::Down), 20);
        engine.step(&mut state, Some(Direction::Left), 30);
        let outcome = engine.step(&mut state, Some(Direction::Up), 500);

        assert!(outcome.game_over);
        assert_eq!(outcome.expired_effects, vec![Effect::Ghost]);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(8, 8));

        let outcome = engine.step(&mut state, Some(Direction::Left), 0);

        assert!(!outcome.game_over);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_shrink_pickup() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 5), Position::new(8, 8));
        state.power_ups.push(PowerUp {
            kind: Effect::Shrink,
            position: Position::new(6, 5),
            expires_at: 15_000,
        });

        let outcome = engine.step(&mut state, None, 1000);

        assert_eq!(outcome.picked_up, vec![Effect::Shrink]);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        assert!(state.power_ups.is_empty());
        assert_eq!(state.effects.remaining(Effect::Shrink, 1000), Some(1200));
    }

    #[test]
    fn test_timed_pickups_apply_effects() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(8, 8));
        state.power_ups.push(PowerUp {
            kind: Effect::SpeedBoost,
            position: Position::new(6, 5),
            expires_at: 15_000,
        });

        let outcome = engine.step(&mut state, None, 1000);

        assert_eq!(outcome.picked_up, vec![Effect::SpeedBoost]);
        assert_eq!(state.effects.timer(Effect::SpeedBoost).expires_at, Some(7000));
        assert_eq!(outcome.next_delay, Some(71));
    }

    #[test]
    fn test_expired_power_ups_are_removed_lazily() {
        let mut engine = engine();
        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(8, 8));
        state.power_ups.push(PowerUp {
            kind: Effect::Ghost,
            position: Position::new(0, 0),
            expires_at: 500,
        });
        state.power_ups.push(PowerUp {
            kind: Effect::Slow,
            position: Position::new(0, 9),
            expires_at: 5000,
        });

        let outcome = engine.step(&mut state, None, 500);
        assert_eq!(outcome.expired_power_ups, 0);
        assert_eq!(state.power_ups.len(), 2);

        let outcome = engine.step(&mut state, None, 501);
        assert_eq!(outcome.expired_power_ups, 1);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].kind, Effect::Slow);
    }

    #[test]
    fn test_bonus_power_up_respects_cap() {
        let mut config = GameConfig::small().with_seed(3);
        config.power_up_spawn_chance = 1.0;
        let mut engine = TickEngine::new(config);

        let mut state = running(line(Position::new(5, 5), Direction::Right, 4), Position::new(6, 5));
        let outcome = engine.step(&mut state, None, 0);
        assert!(outcome.spawned_power_up.is_some());
        assert_eq!(state.power_ups.len(), 1);

        for i in 0..4 {
            let head = state.snake.head();
            state.food = head.moved_in_direction(state.snake.direction);
            state.power_ups.retain(|p| p.position != state.food);
            engine.step(&mut state, None, 100 * (i + 1));
            assert!(state.power_ups.len() <= 3);
        }
        assert_eq!(state.power_ups.len(), 3);
    }

    #[test]
    fn test_tick_delays() {
        let engine = engine();
        let mut effects = EffectRegistry::new();
        assert_eq!(engine.tick_delay(&effects), 120);

        effects.apply(Effect::SpeedBoost, 6000, 0);
        assert_eq!(engine.tick_delay(&effects), 71);

        effects.apply(Effect::Slow, 8000, 0);
        assert_eq!(engine.tick_delay(&effects), 200);
        assert!((engine.speed_multiplier(&effects) - 0.6).abs() < 1e-9);
    }
}
