//! Power Snake - a wrap-around Snake game with timed power-ups
//!
//! This library provides:
//! - Core game logic and the variable-rate tick engine (game module)
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Play statistics and high score persistence (metrics, persistence modules)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
