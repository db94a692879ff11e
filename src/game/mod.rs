//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The presentation loop drives it one tick at a time.

pub mod config;
pub mod direction;
pub mod engine;
pub mod phase;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, MAX_TILE_COUNT, MIN_CELL_SIZE};
pub use direction::Direction;
pub use engine::{GameEngine, GameOverReason, StepDelta};
pub use phase::Phase;
pub use state::{GameState, Position, Snake};
