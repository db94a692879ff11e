//! High score persistence
//!
//! The presentation loop only needs a single integer that outlives the
//! process. It reads it once at startup and writes it every time a game beats
//! it. The `HighScoreStore` trait keeps that capability injectable so tests
//! and `--no-persist` runs can use the in-memory store.
//!
//! The file store keeps a flat JSON object so other keys written by other
//! tools survive our writes:
//!
//! ```json
//! { "snake_high_score": 120 }
//! ```

use anyhow::{Context, Result};
use log::warn;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key under which the high score is stored
pub const HIGH_SCORE_KEY: &str = "snake_high_score";

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = ".snake_arcade.json";

/// Get/set access to the persisted high score
pub trait HighScoreStore {
    /// Stored high score, or 0 when nothing has been stored yet
    fn get(&self) -> Result<u32>;

    fn set(&mut self, score: u32) -> Result<()>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn get(&self) -> Result<u32> {
        (**self).get()
    }

    fn set(&mut self, score: u32) -> Result<()> {
        (**self).set(score)
    }
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let map = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high score file {:?}", self.path))?;
        Ok(Some(map))
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn get(&self) -> Result<u32> {
        let Some(map) = self.read_map()? else {
            return Ok(0);
        };

        match map.get(HIGH_SCORE_KEY) {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .with_context(|| format!("{} is not a valid score: {}", HIGH_SCORE_KEY, value)),
        }
    }

    fn set(&mut self, score: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut map = match self.read_map() {
            Ok(map) => map.unwrap_or_default(),
            Err(e) => {
                warn!("Overwriting unreadable high score file: {:#}", e);
                Map::new()
            }
        };
        map.insert(HIGH_SCORE_KEY.to_string(), Value::from(score));

        let json = serde_json::to_string_pretty(&map).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

/// Process-local store. Nothing survives exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: Option<u32>,
    writes: usize,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u32) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn get(&self) -> Result<u32> {
        Ok(self.value.unwrap_or(0))
    }

    fn set(&mut self, score: u32) -> Result<()> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}
