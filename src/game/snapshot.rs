//! Read-only view of a session for renderers and UI badges

use serde::Serialize;

use super::Millis;
use super::effects::Effect;
use super::state::{Position, SessionStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub kind: Effect,
    pub position: Position,
    pub remaining_ms: Millis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectView {
    pub effect: Effect,
    pub remaining_ms: Millis,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub cols: i32,
    pub rows: i32,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub power_ups: Vec<PowerUpView>,
    pub effects: Vec<EffectView>,
    pub score: u32,
    pub status: SessionStatus,
    pub tick_delay_ms: Millis,
    pub speed_multiplier: f64,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn is_effect_active(&self, effect: Effect) -> bool {
        self.effects.iter().any(|view| view.effect == effect)
    }
}
