use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameState, Position, Snake},
};

/// What a successful tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDelta {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Score after the move
    pub score: u32,
}

/// Why a tick ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Head left the grid
    OutOfBounds,
    /// Head entered a cell the snake already occupies
    SelfCollision,
    /// The last meal covered every tile; nowhere is left for food
    BoardFilled,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::OutOfBounds => f.write_str("hit the wall"),
            GameOverReason::SelfCollision => f.write_str("ran into itself"),
            GameOverReason::BoardFilled => f.write_str("filled the board"),
        }
    }
}

impl std::error::Error for GameOverReason {}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed food sequence, for reproducible games
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh game: centred snake heading right, score 0, food placed.
    pub fn new_game(&mut self) -> GameState {
        let centre = (self.config.tile_count / 2) as i32;

        let snake = Snake::new(
            Position::new(centre, centre),
            Direction::Right,
            self.config.initial_snake_length,
        );
        // `GameConfig::validate` leaves at least one free tile at start.
        let food = self
            .place_food(&snake)
            .unwrap_or_else(|| snake.tail());

        GameState::new(snake, food, Direction::Right, self.config.tile_count)
    }

    /// Advance the game by one tick.
    ///
    /// Collisions are tested against the whole body as it was before the
    /// move, so entering the cell the tail is about to leave is still a
    /// collision. On a wall or self collision the snake and score are left
    /// untouched. `BoardFilled` is reported after the final meal has been
    /// eaten, so the snake and score include it.
    pub fn step(&mut self, state: &mut GameState) -> Result<StepDelta, GameOverReason> {
        state.velocity = state.pending_velocity;
        let new_head = state.snake.head().moved_in_direction(state.velocity);

        if !state.is_in_bounds(new_head) {
            return Err(GameOverReason::OutOfBounds);
        }
        if state.snake.occupies(new_head) {
            return Err(GameOverReason::SelfCollision);
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score += self.config.food_score;
            match self.place_food(&state.snake) {
                Some(food) => state.food = food,
                None => return Err(GameOverReason::BoardFilled),
            }
        }

        Ok(StepDelta {
            ate_food,
            score: state.score,
        })
    }

    /// Pick a uniformly random tile not covered by the snake, or `None` when
    /// the snake covers the whole grid.
    ///
    /// Rejection sampling. With at least one free tile it terminates with
    /// probability 1.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        if snake.len() >= self.config.tile_count * self.config.tile_count {
            return None;
        }

        let n = self.config.tile_count as i32;
        loop {
            let pos = Position::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}
