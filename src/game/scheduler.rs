use super::Millis;

/// Single-slot wake-up time for the next tick.
///
/// The delay is recomputed after every tick, so this is a variable-rate
/// schedule. Suspending drops the pending wake time; resuming schedules a
/// fresh one from the moment of resumption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickScheduler {
    next_tick_at: Option<Millis>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake up `delay` milliseconds after `now`, replacing any pending wake
    pub fn schedule(&mut self, now: Millis, delay: Millis) {
        self.next_tick_at = Some(now.saturating_add(delay));
    }

    /// Drop the pending wake time
    pub fn suspend(&mut self) {
        self.next_tick_at = None;
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.next_tick_at.is_some_and(|at| now >= at)
    }

    pub fn next_wake(&self) -> Option<Millis> {
        self.next_tick_at
    }
}
