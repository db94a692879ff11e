use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use log::{error, info, warn};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};

use super::ui::{Overlay, TextField, UiSink};
use crate::game::{GameEngine, GameOverReason, GameState, Phase, StepDelta};
use crate::input::KeyAction;
use crate::persistence::HighScoreStore;

/// Which of the session's timers fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    ShakeEnded,
}

/// Result of one tick, telling the host what to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved; redraw
    Redraw(StepDelta),
    /// The game just ended; redraw with the game-over overlay
    GameOver(GameOverReason),
    /// Tick outside a running game. Nothing changed.
    Idle,
}

/// One play session: owns the current game, the phase machine, the tick and
/// shake timers, and the high score.
pub struct Session<S: HighScoreStore, U: UiSink> {
    engine: GameEngine,
    state: GameState,
    phase: Phase,
    high_score: u32,
    store: S,
    ui: U,
    ticker: Option<Interval>,
    tick_period: Duration,
    shake: Option<Pin<Box<Sleep>>>,
    shake_duration: Duration,
    ticks: u64,
}

impl<S: HighScoreStore, U: UiSink> Session<S, U> {
    pub fn new(mut engine: GameEngine, store: S, mut ui: U) -> Self {
        let high_score = store.get().unwrap_or_else(|e| {
            warn!("Could not read high score, starting from 0: {:#}", e);
            0
        });
        ui.set_text(TextField::HighScore, high_score.to_string());
        ui.set_overlay(Overlay::Start, true);
        ui.set_overlay(Overlay::GameOver, false);

        // A board is laid out behind the start overlay before the first game.
        let state = engine.new_game();
        let tick_period = engine.config().tick_period();
        let shake_duration = engine.config().shake_duration();

        Self {
            engine,
            state,
            phase: Phase::NotStarted,
            high_score,
            store,
            ui,
            ticker: None,
            tick_period,
            shake: None,
            shake_duration,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ticks processed since the session was created
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start a new game. Also used to restart after a game over.
    ///
    /// No-op while a game is running, so a running timer is never doubled.
    /// Returns whether a game was started.
    pub fn start(&mut self) -> bool {
        if !self.phase.can_start() {
            return false;
        }

        self.stop_timer();
        self.state = self.engine.new_game();
        self.ui.set_text(TextField::Score, self.state.score.to_string());
        self.ui.set_overlay(Overlay::Start, false);
        self.ui.set_overlay(Overlay::GameOver, false);
        self.phase = Phase::Running;
        self.start_timer();

        info!("Game started on a {0}x{0} grid", self.state.tile_count);
        true
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, action: &KeyAction) {
        // Any key leaves the start screen.
        if self.phase == Phase::NotStarted && self.ui.is_overlay_visible(Overlay::Start) {
            self.start();
            return;
        }

        match action {
            KeyAction::Turn(direction) => {
                self.state.request_turn(*direction);
            }
            KeyAction::Start => {
                self.start();
            }
            KeyAction::Quit | KeyAction::None => {}
        }
    }

    /// Wait for the next timer. Never resolves while neither the tick timer
    /// nor the shake timer is armed.
    pub async fn next_timer(&mut self) -> TimerEvent {
        tokio::select! {
            _ = wait_tick(self.ticker.as_mut()) => TimerEvent::Tick,
            _ = wait_sleep(self.shake.as_mut()) => TimerEvent::ShakeEnded,
        }
    }

    /// Advance the game by one tick.
    pub fn on_tick(&mut self) -> TickOutcome {
        debug_assert!(self.phase.is_running(), "tick outside a running game");
        if !self.phase.is_running() {
            return TickOutcome::Idle;
        }

        self.ticks += 1;
        match self.engine.step(&mut self.state) {
            Ok(delta) => {
                if delta.ate_food {
                    self.ui.set_text(TextField::Score, delta.score.to_string());
                    self.record_score(delta.score);
                }
                TickOutcome::Redraw(delta)
            }
            Err(reason) => {
                // Filling the board eats the last food before the game ends.
                if reason == GameOverReason::BoardFilled {
                    self.ui.set_text(TextField::Score, self.state.score.to_string());
                    self.record_score(self.state.score);
                }
                self.game_over(reason);
                TickOutcome::GameOver(reason)
            }
        }
    }

    /// The game-over shake ran its course.
    pub fn end_shake(&mut self) {
        self.shake = None;
        self.ui.set_shaking(false);
    }

    fn record_score(&mut self, score: u32) {
        if score <= self.high_score {
            return;
        }

        self.high_score = score;
        self.ui.set_text(TextField::HighScore, score.to_string());
        info!("New high score: {}", score);

        if let Err(e) = self.store.set(score) {
            error!("Failed to save high score: {:#}", e);
        }
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.stop_timer();
        self.phase = Phase::GameOver;

        self.ui.set_text(TextField::FinalScore, self.state.score.to_string());
        self.ui.set_overlay(Overlay::GameOver, true);
        self.ui.set_shaking(true);
        self.shake = Some(Box::pin(sleep(self.shake_duration)));

        info!(
            "Game over: snake {} with score {} (length {})",
            reason,
            self.state.score,
            self.state.snake.len()
        );
    }

    fn start_timer(&mut self) {
        self.stop_timer();

        // First tick lands one full period after the start.
        let mut ticker = interval_at(Instant::now() + self.tick_period, self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn stop_timer(&mut self) {
        self.ticker = None;
    }
}

async fn wait_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}

async fn wait_sleep(timer: Option<&mut Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ui::UiState;
    use crate::game::{Direction, GameConfig, Position, Snake};
    use crate::persistence::MemoryHighScoreStore;

    /// Store whose writes always fail
    struct FailingStore;

    impl HighScoreStore for FailingStore {
        fn get(&self) -> anyhow::Result<u32> {
            Ok(0)
        }

        fn set(&mut self, _score: u32) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    fn session() -> Session<MemoryHighScoreStore, UiState> {
        session_with_store(MemoryHighScoreStore::new())
    }

    fn session_with_store<S: HighScoreStore>(store: S) -> Session<S, UiState> {
        Session::new(
            GameEngine::with_seed(GameConfig::default(), 11),
            store,
            UiState::new(),
        )
    }

    /// Put the running game one step away from the right wall.
    fn park_at_wall(session: &mut Session<MemoryHighScoreStore, UiState>) {
        session.state.snake = Snake::from_cells(vec![
            Position::new(19, 3),
            Position::new(18, 3),
            Position::new(17, 3),
        ]);
        session.state.food = Position::new(0, 0);
    }

    #[tokio::test]
    async fn test_initial_session() {
        let session = session_with_store(MemoryHighScoreStore::with_value(70));

        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.high_score(), 70);
        assert_eq!(session.ui().high_score, "70");
        assert!(session.ui().start_overlay);
        assert!(!session.is_ticking());
    }

    #[tokio::test]
    async fn test_any_key_starts_from_start_screen() {
        let mut session = session();

        session.handle_key(&KeyAction::None);

        assert_eq!(session.phase(), Phase::Running);
        assert!(!session.ui().start_overlay);
        assert!(session.is_ticking());
        // The key was used to start, not to steer.
        assert_eq!(session.state().pending_velocity, Direction::Right);
    }

    #[tokio::test]
    async fn test_turn_key_while_running() {
        let mut session = session();
        session.start();

        session.handle_key(&KeyAction::Turn(Direction::Left));
        assert_eq!(session.state().pending_velocity, Direction::Right);

        session.handle_key(&KeyAction::Turn(Direction::Up));
        assert_eq!(session.state().pending_velocity, Direction::Up);
    }

    #[tokio::test]
    async fn test_first_tick_of_new_game() {
        let mut session = session();
        session.start();
        session.state.food = Position::new(0, 0);

        let outcome = session.on_tick();

        assert!(matches!(outcome, TickOutcome::Redraw(d) if !d.ate_food));
        assert_eq!(
            session.state().snake.cells(),
            &[
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10)
            ]
        );
        assert_eq!(session.state().score, 0);
    }

    #[tokio::test]
    async fn test_eating_updates_score_and_high_score() {
        let mut session = session();
        session.start();
        session.state.food = Position::new(11, 10);

        session.on_tick();

        assert_eq!(session.state().score, 10);
        assert_eq!(session.state().snake.len(), 4);
        assert!(!session.state().snake.occupies(session.state().food));
        assert_eq!(session.ui().score, "10");
        assert_eq!(session.high_score(), 10);
        assert_eq!(session.ui().high_score, "10");
        assert_eq!(session.store().get().unwrap(), 10);
        assert_eq!(session.store().writes(), 1);
    }

    #[tokio::test]
    async fn test_score_below_high_score_is_not_persisted() {
        let mut session = session_with_store(MemoryHighScoreStore::with_value(50));
        session.start();
        session.state.food = Position::new(11, 10);

        session.on_tick();

        assert_eq!(session.high_score(), 50);
        assert_eq!(session.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_game_running() {
        let mut session = session_with_store(FailingStore);
        session.start();
        session.state.food = Position::new(11, 10);

        let outcome = session.on_tick();

        assert!(matches!(outcome, TickOutcome::Redraw(d) if d.ate_food));
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.is_ticking());
        assert_eq!(session.high_score(), 10);
        assert_eq!(session.ui().high_score, "10");
    }

    #[tokio::test]
    async fn test_filling_the_board_ends_game() {
        let mut session = Session::new(
            GameEngine::with_seed(GameConfig::new(4), 11),
            MemoryHighScoreStore::new(),
            UiState::new(),
        );
        session.start();

        // Serpentine covering every tile but (0,3), head at (1,3) facing it.
        let mut cells = Vec::new();
        for y in 0..4 {
            let xs: Vec<i32> = if y % 2 == 0 {
                (0..4).collect()
            } else {
                (0..4).rev().collect()
            };
            cells.extend(xs.into_iter().map(|x| Position::new(x, y)));
        }
        cells.retain(|p| *p != Position::new(0, 3));
        cells.reverse();
        session.state = GameState::new(
            Snake::from_cells(cells),
            Position::new(0, 3),
            Direction::Left,
            4,
        );

        let outcome = session.on_tick();

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::BoardFilled));
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.is_ticking());
        assert_eq!(session.state().snake.len(), 16);
        assert_eq!(session.ui().score, "10");
        assert_eq!(session.ui().final_score, "10");
        assert_eq!(session.high_score(), 10);
        assert_eq!(session.store().writes(), 1);
    }

    #[tokio::test]
    async fn test_wall_hit_ends_game() {
        let mut session = session();
        session.start();
        park_at_wall(&mut session);

        let outcome = session.on_tick();

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::OutOfBounds));
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.is_ticking());
        assert!(session.ui().game_over_overlay);
        assert_eq!(session.ui().final_score, "0");
        assert!(session.ui().shaking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shake_reverts_after_duration() {
        let mut session = session();
        session.start();
        park_at_wall(&mut session);
        session.on_tick();
        let ended_at = Instant::now();

        assert_eq!(session.next_timer().await, TimerEvent::ShakeEnded);
        session.end_shake();

        assert_eq!(Instant::now() - ended_at, Duration::from_millis(500));
        assert!(!session.ui().shaking);
        // Shake is cosmetic only.
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[tokio::test]
    async fn test_restart_after_game_over() {
        let mut session = session();
        session.start();
        session.state.food = Position::new(11, 10);
        session.on_tick();
        park_at_wall(&mut session);
        session.on_tick();
        assert_eq!(session.phase(), Phase::GameOver);

        session.handle_key(&KeyAction::Start);

        assert_eq!(session.phase(), Phase::Running);
        assert!(session.is_ticking());
        assert_eq!(session.state().score, 0);
        assert_eq!(session.ui().score, "0");
        assert!(!session.ui().game_over_overlay);
        assert_eq!(
            session.state().snake.cells(),
            &[
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        // High score survives the restart.
        assert_eq!(session.high_score(), 10);
    }

    #[tokio::test]
    async fn test_turn_keys_do_not_restart_after_game_over() {
        let mut session = session();
        session.start();
        park_at_wall(&mut session);
        session.on_tick();

        session.handle_key(&KeyAction::Turn(Direction::Up));
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[tokio::test]
    async fn test_high_score_never_decreases_across_games() {
        let mut session = session();
        let mut seen = 0;

        for meals in [3, 1, 2] {
            session.start();
            for _ in 0..meals {
                let ahead = session.state.snake.head().moved_in_direction(session.state.velocity);
                session.state.food = ahead;
                session.on_tick();
            }
            assert!(session.high_score() >= seen);
            seen = session.high_score();

            // Run into the right wall to end the game.
            session.state.food = Position::new(0, 0);
            while session.phase().is_running() {
                session.on_tick();
            }
        }

        assert_eq!(session.high_score(), 30);
        assert_eq!(session.store().writes(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_the_period() {
        let mut session = session();
        let started_at = Instant::now();
        session.start();
        session.state.food = Position::new(0, 0);

        for _ in 0..5 {
            assert_eq!(session.next_timer().await, TimerEvent::Tick);
            session.on_tick();
        }

        assert_eq!(Instant::now() - started_at, Duration::from_millis(1000));
        assert_eq!(session.ticks(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_while_running_keeps_single_tick_source() {
        let mut session = session();
        let started_at = Instant::now();
        session.start();
        session.state.food = Position::new(0, 0);

        // Halfway into the first period, both start paths must be no-ops.
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!session.start());
        session.handle_key(&KeyAction::Start);

        for _ in 0..3 {
            assert_eq!(session.next_timer().await, TimerEvent::Tick);
            session.on_tick();
        }

        // A reset timer would have pushed this to 700ms; a second source
        // would have produced more ticks by now.
        assert_eq!(Instant::now() - started_at, Duration::from_millis(600));
        assert_eq!(session.ticks(), 3);
        assert_eq!(session.state().snake.head(), Position::new(13, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over_restarts_timer() {
        let mut session = session();
        session.start();
        park_at_wall(&mut session);
        session.on_tick();
        session.end_shake();

        let restarted_at = Instant::now();
        assert!(session.start());
        session.state.food = Position::new(0, 0);

        assert_eq!(session.next_timer().await, TimerEvent::Tick);
        assert_eq!(Instant::now() - restarted_at, Duration::from_millis(200));
    }
}
