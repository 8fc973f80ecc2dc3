use anyhow::{Context, Result};
use clap::Parser;
use power_snake::game::GameConfig;
use power_snake::modes::HumanMode;
use power_snake::persistence::{DEFAULT_HIGH_SCORE_FILE, JsonHighScoreStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "power_snake")]
#[command(version, about = "Wrap-around Snake with timed power-ups")]
struct Cli {
    /// Grid width, at most 1000 (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height, at most 1000 (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Fixed RNG seed for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with game tuning parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the best score is kept
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the TUI, so logs only go to a file
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = build_config(&cli).context("Invalid game configuration")?;
    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = ?config.seed,
        "configuration loaded"
    );

    let store = JsonHighScoreStore::new(&cli.high_score_file);
    let mut human_mode = HumanMode::new(config, store)?;
    human_mode.run().await
}
