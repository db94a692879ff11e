use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::ArcadeMode;
use snake_arcade::persistence::{
    FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, DEFAULT_HIGH_SCORE_FILE,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// JSON game config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tiles per side of the square grid
    #[arg(long)]
    tiles: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log file (the terminal itself is taken by the game)
    #[arg(long, default_value = "snake_arcade.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(tiles) = self.tiles {
            config.tile_count = tiles;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_period_ms = tick_ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting snake_arcade with {:?}", config);

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryHighScoreStore::new())
    } else {
        Box::new(FileHighScoreStore::new(&cli.high_score_file))
    };

    let mut arcade = ArcadeMode::new(config, store);
    arcade.run().await?;

    Ok(())
}
