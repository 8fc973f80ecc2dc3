use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{interval, sleep_until};

use crate::game::{Command, GameConfig, GameSession, Millis, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// The session is driven from a single task: key events, the session's
/// variable tick deadline and the render interval are multiplexed with
/// `tokio::select!`, so the game state only ever has one writer.
pub struct HumanMode<S: HighScoreStore> {
    session: GameSession,
    store: S,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    epoch: Instant,
    should_quit: bool,
}

impl<S: HighScoreStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        let high_score = store.load().context("Failed to load high score")?;
        let epoch = Instant::now();

        let mut session = GameSession::new(config);
        session.start(0);

        Ok(Self {
            session,
            store,
            metrics: GameMetrics::with_high_score(high_score),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            epoch,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            // Ticks have no fixed rate; sleep until the session's next wake time
            let wake = self.session.next_wake();
            let deadline = self.epoch + Duration::from_millis(wake.unwrap_or(0));

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = sleep_until(deadline.into()), if wake.is_some() => {
                    self.update_game()?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    let now = self.now();
                    self.metrics.sample(now, self.session.status());
                    let snapshot = self.session.snapshot(now);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(Command::Restart) => self.reset_game(),
                KeyAction::Game(command) => {
                    let now = self.now();
                    self.session.handle(command, now);
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        let now = self.now();
        if let Some(outcome) = self.session.poll(now) {
            self.on_tick(&outcome)?;
        }
        Ok(())
    }

    fn on_tick(&mut self, outcome: &TickOutcome) -> Result<()> {
        if !outcome.game_over {
            return Ok(());
        }

        // Track game over
        if let Some(score) = self.session.final_score() {
            self.metrics.on_game_over(score);
            self.store
                .record(score)
                .context("Failed to save high score")?;
        }

        Ok(())
    }

    fn reset_game(&mut self) {
        let now = self.now();
        self.session.start(now);
        self.metrics.on_game_start();
    }

    fn now(&self) -> Millis {
        self.epoch.elapsed().as_millis() as Millis
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
