//! Session lifecycle around the tick engine
//!
//! A session owns the only mutable copy of the game state. Input sources
//! talk to it through [`GameSession::handle`], the driving loop calls
//! [`GameSession::poll`] whenever the scheduler's wake time is reached, and
//! renderers read [`GameSession::snapshot`] between ticks.

use tracing::info;

use super::{
    Millis,
    action::{Command, Direction},
    config::GameConfig,
    engine::{TickEngine, TickOutcome},
    scheduler::TickScheduler,
    snapshot::{EffectView, PowerUpView, Snapshot},
    state::{GameState, SessionStatus},
};

pub struct GameSession {
    engine: TickEngine,
    state: GameState,
    scheduler: TickScheduler,
    pending_direction: Option<Direction>,
}

impl GameSession {
    /// Create an idle session; nothing moves until [`GameSession::start`]
    pub fn new(config: GameConfig) -> Self {
        let mut engine = TickEngine::new(config);
        let state = engine.reset(0);

        Self {
            engine,
            state,
            scheduler: TickScheduler::new(),
            pending_direction: None,
        }
    }

    /// Reset everything and begin ticking.
    ///
    /// Works from any status, so it doubles as restart after game over.
    pub fn start(&mut self, now: Millis) {
        self.state = self.engine.reset(now);
        self.state.status = SessionStatus::Running;
        self.pending_direction = None;

        let delay = self.engine.tick_delay(&self.state.effects);
        self.scheduler.schedule(now, delay);

        info!(
            cols = self.state.grid.cols,
            rows = self.state.grid.rows,
            "session started"
        );
    }

    /// Flip between running and paused; ignored in any other status
    pub fn toggle_pause(&mut self, now: Millis) {
        match self.state.status {
            SessionStatus::Running => {
                self.state.status = SessionStatus::Paused;
                self.scheduler.suspend();
                info!(score = self.state.score, "paused");
            }
            SessionStatus::Paused => {
                self.state.status = SessionStatus::Running;
                let delay = self.engine.tick_delay(&self.state.effects);
                self.scheduler.schedule(now, delay);
                info!("resumed");
            }
            SessionStatus::NotStarted | SessionStatus::Ended => {}
        }
    }

    /// Buffer a heading for the next tick.
    ///
    /// Only the latest accepted direction is kept. A direction reversing
    /// the current heading is dropped.
    pub fn queue_direction(&mut self, direction: Direction) {
        if !matches!(
            self.state.status,
            SessionStatus::Running | SessionStatus::Paused
        ) {
            return;
        }

        if self.state.snake.direction.is_opposite(direction) {
            return;
        }

        self.pending_direction = Some(direction);
    }

    pub fn handle(&mut self, command: Command, now: Millis) {
        match command {
            Command::Turn(direction) => self.queue_direction(direction),
            Command::TogglePause => self.toggle_pause(now),
            Command::Restart => self.start(now),
        }
    }

    /// Run a tick if one is due at `now`
    pub fn poll(&mut self, now: Millis) -> Option<TickOutcome> {
        if !self.scheduler.is_due(now) {
            return None;
        }
        Some(self.advance(now))
    }

    /// Run one tick immediately and schedule the next.
    ///
    /// Has no effect unless the session is running.
    pub fn advance(&mut self, now: Millis) -> TickOutcome {
        let pending = if self.state.is_running() {
            self.pending_direction.take()
        } else {
            None
        };

        let outcome = self.engine.step(&mut self.state, pending, now);

        if outcome.game_over {
            self.game_over();
        } else if let Some(delay) = outcome.next_delay {
            self.scheduler.schedule(now, delay);
        }

        outcome
    }

    /// Freeze the simulation and return the final score
    pub fn game_over(&mut self) -> u32 {
        self.state.status = SessionStatus::Ended;
        self.scheduler.suspend();
        self.pending_direction = None;
        info!(score = self.state.score, "game over");
        self.state.score
    }

    /// Score of a finished session
    pub fn final_score(&self) -> Option<u32> {
        self.state.is_over().then_some(self.state.score)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// When the next tick is due, `None` while paused, idle or ended
    pub fn next_wake(&self) -> Option<Millis> {
        self.scheduler.next_wake()
    }

    pub fn snapshot(&self, now: Millis) -> Snapshot {
        let state = &self.state;

        let power_ups = state
            .power_ups
            .iter()
            .map(|p| PowerUpView {
                kind: p.kind,
                position: p.position,
                remaining_ms: p.expires_at.saturating_sub(now),
            })
            .collect();

        let effects = state
            .effects
            .active()
            .map(|effect| EffectView {
                effect,
                remaining_ms: state.effects.remaining(effect, now).unwrap_or(0),
            })
            .collect();

        Snapshot {
            cols: state.grid.cols,
            rows: state.grid.rows,
            snake: state.snake.body.iter().copied().collect(),
            food: state.food,
            power_ups,
            effects,
            score: state.score,
            status: state.status,
            tick_delay_ms: self.engine.tick_delay(&state.effects),
            speed_multiplier: self.engine.speed_multiplier(&state.effects),
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
