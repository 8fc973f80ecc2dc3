use crate::game::{Millis, SessionStatus};

/// Scoreboard kept across the sessions of one process.
///
/// Play time is sampled on the session clock and only accumulates between
/// two samples taken while the session is running, so it stands still while
/// paused and after game over.
#[derive(Debug, Clone, Default)]
pub struct GameMetrics {
    pub high_score: u32,
    pub games_played: u32,
    /// Whether the last finished game set a new high score
    pub new_high_score: bool,
    play_time: Millis,
    last_sample: Option<Millis>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously stored best score
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            ..Self::default()
        }
    }

    /// Record a clock sample for a session in `status`
    pub fn sample(&mut self, now: Millis, status: SessionStatus) {
        if status != SessionStatus::Running {
            self.last_sample = None;
            return;
        }

        if let Some(prev) = self.last_sample {
            self.play_time += now.saturating_sub(prev);
        }
        self.last_sample = Some(now);
    }

    pub fn play_time(&self) -> Millis {
        self.play_time
    }

    pub fn on_game_start(&mut self) {
        self.play_time = 0;
        self.last_sample = None;
        self.new_high_score = false;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.last_sample = None;
        self.new_high_score = final_score > self.high_score;
        if self.new_high_score {
            self.high_score = final_score;
        }
    }

    /// Play time as `MM:SS`
    pub fn format_time(&self) -> String {
        let secs = self.play_time / 1000;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
