//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is passed in explicitly as milliseconds on a caller-owned clock, so the
//! whole simulation can be driven deterministically from tests.

pub mod action;
pub mod config;
pub mod effects;
pub mod engine;
pub mod grid;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod spawner;
pub mod state;

/// Milliseconds on the session clock
pub type Millis = u64;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ConfigError, GameConfig, MAX_GRID_SIDE};
pub use effects::{Effect, EffectRegistry, EffectTimer};
pub use engine::{TickEngine, TickOutcome};
pub use grid::Grid;
pub use scheduler::TickScheduler;
pub use session::GameSession;
pub use snapshot::{EffectView, PowerUpView, Snapshot};
pub use spawner::Spawner;
pub use state::{GameState, Position, PowerUp, SessionStatus, Snake};
