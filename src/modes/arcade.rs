use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use crate::app::{Session, TickOutcome, TimerEvent, UiState};
use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Interactive game in the terminal
pub struct ArcadeMode {
    session: Session<Box<dyn HighScoreStore>, UiState>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl ArcadeMode {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let renderer = Renderer::new(config.cell_size);
        let engine = GameEngine::new(config);

        Self {
            session: Session::new(engine, store, UiState::new()),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        cleanup_terminal(&mut terminal)?;

        info!(
            "Leaving after {} ticks, high score {}",
            self.session.ticks(),
            self.session.high_score()
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        self.draw(terminal)?;

        loop {
            let redraw = tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => {
                        self.should_quit = true;
                        false
                    }
                },

                // Tick timer and game-over shake
                timer = self.session.next_timer() => match timer {
                    TimerEvent::Tick => !matches!(self.session.on_tick(), TickOutcome::Idle),
                    TimerEvent::ShakeEnded => {
                        self.session.end_shake();
                        true
                    }
                },

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                    false
                }
            };

            if self.should_quit {
                break;
            }

            if redraw {
                self.draw(terminal)?;
            }
        }

        Ok(())
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, self.session.state(), self.session.ui());
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    /// Returns whether the screen needs redrawing.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release or repeat
                if key.kind != KeyEventKind::Press {
                    return false;
                }

                let action = self.input_handler.handle_key_event(key);
                if action == KeyAction::Quit {
                    self.should_quit = true;
                    return false;
                }

                self.session.handle_key(&action);
                true
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

}

/// Runs its undo action on drop unless disarmed first.
struct Restore<F: FnOnce()> {
    undo: Option<F>,
}

impl<F: FnOnce()> Restore<F> {
    fn new(undo: F) -> Self {
        Self { undo: Some(undo) }
    }

    fn disarm(mut self) {
        self.undo = None;
    }
}

impl<F: FnOnce()> Drop for Restore<F> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            undo();
        }
    }
}

/// Raw mode plus alternate screen. A failure part way leaves the terminal as
/// it was found.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let raw_mode = Restore::new(|| {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    });

    execute!(stderr(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let alternate_screen = Restore::new(|| {
        if let Err(e) = execute!(stderr(), LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
    });

    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;

    alternate_screen.disarm();
    raw_mode.disarm();
    Ok(terminal)
}

/// Undo `setup_terminal`. Every step is attempted; the first failure is
/// returned.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    let raw_mode = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("Failed to show cursor");
    raw_mode.and(screen).and(cursor)
}
