//! Snake Arcade - classic single-screen Snake
//!
//! This library provides:
//! - Core game logic (game module): grid, snake, food, the tick step
//! - Presentation loop (app module): phases, timers, high score, UI state
//! - Key mapping (input module)
//! - Drawing (render module): pixel-space scene plus a ratatui surface
//! - High score storage (persistence module)
//! - The interactive terminal host (modes module)

pub mod app;
pub mod game;
pub mod input;
pub mod modes;
pub mod persistence;
pub mod render;
