//! Timed status effects granted by power-ups
//!
//! Every effect kind owns exactly one timer slot. Applying an effect that is
//! already running refreshes its timer instead of stacking a second one, and
//! expiry only happens when the engine calls [`EffectRegistry::tick`].

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use super::Millis;

/// A power-up kind and the modifier it grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Effect {
    /// Food is worth two points instead of one
    DoubleScore,
    /// Ticks run at the fixed slow delay
    Slow,
    /// Cuts the tail on pickup; the timer is only a display window
    Shrink,
    /// Self-collision is ignored
    Ghost,
    /// Ticks run faster by the configured factor
    SpeedBoost,
}

impl Effect {
    pub const ALL: [Effect; 5] = [
        Effect::DoubleScore,
        Effect::Slow,
        Effect::Shrink,
        Effect::Ghost,
        Effect::SpeedBoost,
    ];

    /// Human readable badge label
    pub fn label(&self) -> &'static str {
        match self {
            Effect::DoubleScore => "2x Points",
            Effect::Slow => "Slow-Mo",
            Effect::Shrink => "Shrink",
            Effect::Ghost => "Ghost",
            Effect::SpeedBoost => "Speed Boost",
        }
    }
}

/// Timer slot for a single effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectTimer {
    pub active: bool,
    pub expires_at: Option<Millis>,
}

/// Active effects and their expiry times
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectRegistry {
    timers: EnumMap<Effect, EffectTimer>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `effect` until `now + duration`, replacing any running timer
    pub fn apply(&mut self, effect: Effect, duration: Millis, now: Millis) {
        self.timers[effect] = EffectTimer {
            active: true,
            expires_at: Some(now.saturating_add(duration)),
        };
    }

    /// Deactivate every effect whose expiry lies strictly before `now`.
    ///
    /// Returns the effects that were switched off by this call.
    pub fn tick(&mut self, now: Millis) -> Vec<Effect> {
        let mut expired = Vec::new();

        for (effect, timer) in self.timers.iter_mut() {
            if let Some(expires_at) = timer.expires_at {
                if expires_at < now {
                    *timer = EffectTimer::default();
                    expired.push(effect);
                }
            }
        }

        expired
    }

    pub fn is_active(&self, effect: Effect) -> bool {
        self.timers[effect].active
    }

    pub fn timer(&self, effect: Effect) -> EffectTimer {
        self.timers[effect]
    }

    /// Milliseconds left on an active effect, `None` if it is not running
    pub fn remaining(&self, effect: Effect, now: Millis) -> Option<Millis> {
        let timer = self.timers[effect];
        if !timer.active {
            return None;
        }
        timer.expires_at.map(|at| at.saturating_sub(now))
    }

    /// Active effects in declaration order
    pub fn active(&self) -> impl Iterator<Item = Effect> + '_ {
        self.timers
            .iter()
            .filter(|(_, timer)| timer.active)
            .map(|(effect, _)| effect)
    }

    pub fn clear(&mut self) {
        self.timers = EnumMap::default();
    }
}
