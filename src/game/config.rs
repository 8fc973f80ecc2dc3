use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Millis;
use super::effects::Effect;

/// Largest accepted grid side
pub const MAX_GRID_SIDE: usize = 1000;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the game
///
/// Every tunable of the simulation lives here so that tests can build small,
/// seeded boards and the binary can load overrides from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Timing
    /// Tick delay with no speed effect active
    pub base_delay_ms: Millis,
    /// Tick delay while slow is active, regardless of speed boost
    pub slow_delay_ms: Millis,
    /// Divisor applied to the base delay while speed boost is active
    pub speed_boost_factor: f64,

    // Effects
    /// Duration of double score, slow and ghost
    pub effect_duration_ms: Millis,
    /// Duration of speed boost
    pub speed_boost_duration_ms: Millis,
    /// How long the shrink badge stays visible after pickup
    pub shrink_display_ms: Millis,
    /// Maximum number of tail cells removed by a shrink pickup
    pub shrink_cut: usize,
    /// Shrink never takes the snake below this length
    pub min_snake_length: usize,

    // Spawning
    /// Lifetime of the power-up placed at session start
    pub initial_power_up_ttl_ms: Millis,
    /// Lifetime of power-ups spawned after eating
    pub power_up_ttl_ms: Millis,
    /// Probability of spawning a power-up each time food is eaten
    pub power_up_spawn_chance: f64,
    /// Maximum number of power-ups on the board at once
    pub max_power_ups: usize,
    /// Random samples tried before the spawner gives up looking for a free cell
    pub spawn_attempts: u32,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 4,
            base_delay_ms: 120,
            slow_delay_ms: 200,
            speed_boost_factor: 1.7,
            effect_duration_ms: 8000,
            speed_boost_duration_ms: 6000,
            shrink_display_ms: 1200,
            shrink_cut: 4,
            min_snake_length: 3,
            initial_power_up_ttl_ms: 12_000,
            power_up_ttl_ms: 15_000,
            power_up_spawn_chance: 0.45,
            max_power_ups: 3,
            spawn_attempts: 800,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// How long a freshly picked up effect stays active
    pub fn effect_duration(&self, effect: Effect) -> Millis {
        match effect {
            Effect::DoubleScore | Effect::Slow | Effect::Ghost => self.effect_duration_ms,
            Effect::SpeedBoost => self.speed_boost_duration_ms,
            Effect::Shrink => self.shrink_display_ms,
        }
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid sides are limited to {MAX_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if self.min_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "min_snake_length must be at least 1".to_string(),
            ));
        }

        if self.initial_snake_length < self.min_snake_length {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length ({}) cannot be below min_snake_length ({})",
                self.initial_snake_length, self.min_snake_length
            )));
        }

        if self.initial_snake_length > self.grid_width {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length ({}) does not fit a grid {} cells wide",
                self.initial_snake_length, self.grid_width
            )));
        }

        if self.base_delay_ms == 0 || self.slow_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick delays must be positive".to_string(),
            ));
        }

        if !self.speed_boost_factor.is_finite() || self.speed_boost_factor < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "speed_boost_factor must be at least 1.0, got {}",
                self.speed_boost_factor
            )));
        }

        if !(0.0..=1.0).contains(&self.power_up_spawn_chance) {
            return Err(ConfigError::Invalid(format!(
                "power_up_spawn_chance must be in [0, 1], got {}",
                self.power_up_spawn_chance
            )));
        }

        if self.spawn_attempts == 0 {
            return Err(ConfigError::Invalid(
                "spawn_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
