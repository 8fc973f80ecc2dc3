//! Random placement of food and power-ups
//!
//! Placement samples uniformly random cells and retries while the cell is
//! taken. The search is bounded by `spawn_attempts`, so a nearly full board
//! degrades to a best-effort placement instead of looping forever.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::Millis;
use super::config::GameConfig;
use super::effects::Effect;
use super::grid::Grid;
use super::state::{GameState, Position, PowerUp};

pub struct Spawner {
    rng: StdRng,
    max_attempts: u32,
}

impl Spawner {
    pub fn new(seed: Option<u64>, max_attempts: u32) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.seed, config.spawn_attempts)
    }

    /// Sample cells until one is free, returning `None` once the attempt
    /// ceiling is hit.
    pub fn find_empty_cell<F>(&mut self, grid: &Grid, is_occupied: F) -> Option<Position>
    where
        F: Fn(Position) -> bool,
    {
        (0..self.max_attempts)
            .map(|_| self.sample(grid))
            .find(|&pos| !is_occupied(pos))
    }

    /// Like [`Spawner::find_empty_cell`], but falls back to the last sampled
    /// cell when no free cell turned up.
    pub fn random_empty_cell<F>(&mut self, grid: &Grid, is_occupied: F) -> Position
    where
        F: Fn(Position) -> bool,
    {
        let mut last = self.sample(grid);
        for _ in 1..self.max_attempts {
            if !is_occupied(last) {
                return last;
            }
            last = self.sample(grid);
        }
        last
    }

    /// Place food anywhere not covered by the snake or a power-up
    pub fn spawn_food(&mut self, state: &GameState) -> Position {
        self.random_empty_cell(&state.grid, |pos| {
            state.is_occupied_by_snake(pos) || state.power_up_at(pos).is_some()
        })
    }

    /// Add a random power-up to the board if the cap allows it.
    ///
    /// The initial spawn of a session lives shorter than later ones. When no
    /// free cell is found the spawn is skipped.
    pub fn try_spawn_power_up(
        &mut self,
        state: &mut GameState,
        config: &GameConfig,
        now: Millis,
        initial: bool,
    ) -> Option<PowerUp> {
        if state.power_ups.len() >= config.max_power_ups {
            return None;
        }

        let kind = *Effect::ALL.choose(&mut self.rng)?;
        let position = self.find_empty_cell(&state.grid, |pos| {
            state.is_occupied_by_snake(pos)
                || state.power_up_at(pos).is_some()
                || pos == state.food
        })?;

        let ttl = if initial {
            config.initial_power_up_ttl_ms
        } else {
            config.power_up_ttl_ms
        };

        let power_up = PowerUp {
            kind,
            position,
            expires_at: now.saturating_add(ttl),
        };
        state.power_ups.push(power_up);
        debug!(?kind, x = position.x, y = position.y, "power-up spawned");

        Some(power_up)
    }

    /// Bernoulli trial with the given probability
    pub fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn sample(&mut self, grid: &Grid) -> Position {
        Position::new(
            self.rng.gen_range(0..grid.cols),
            self.rng.gen_range(0..grid.rows),
        )
    }
}
