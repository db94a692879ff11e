use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Largest grid side accepted. Keeps the board addressable in terminal
/// coordinates.
pub const MAX_TILE_COUNT: usize = 256;

/// Smallest tile side in pixels at which the food circle still covers a
/// terminal cell.
pub const MIN_CELL_SIZE: u32 = 8;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tiles per side of the square grid
    pub tile_count: usize,
    /// Milliseconds between simulation ticks
    pub tick_period_ms: u64,
    /// Side of one tile in surface pixels
    pub cell_size: u32,
    /// Points awarded per food eaten
    pub food_score: u32,
    /// Length of the snake at the start of every game
    pub initial_snake_length: usize,
    /// How long the game-over shake lasts
    pub shake_duration_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            tick_period_ms: 200,
            cell_size: 20,
            food_score: 10,
            initial_snake_length: 3,
            shake_duration_ms: 500,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Read a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn shake_duration(&self) -> Duration {
        Duration::from_millis(self.shake_duration_ms)
    }

    /// Reject configurations the simulation cannot run on.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.initial_snake_length >= 3,
            "initial snake length must be at least 3, got {}",
            self.initial_snake_length
        );
        // The snake starts at the centre and trails to the left.
        ensure!(
            self.tile_count / 2 + 1 >= self.initial_snake_length,
            "a {}x{} grid cannot fit a snake of length {}",
            self.tile_count,
            self.tile_count,
            self.initial_snake_length
        );
        ensure!(
            self.tile_count <= MAX_TILE_COUNT,
            "tile count must be at most {}, got {}",
            MAX_TILE_COUNT,
            self.tile_count
        );
        ensure!(
            self.tile_count * self.tile_count > self.initial_snake_length,
            "grid has no free tile for food"
        );
        ensure!(self.tick_period_ms > 0, "tick period must be non-zero");
        ensure!(
            self.cell_size >= MIN_CELL_SIZE,
            "cell size must be at least {} pixels, got {}",
            MIN_CELL_SIZE,
            self.cell_size
        );
        Ok(())
    }
}
