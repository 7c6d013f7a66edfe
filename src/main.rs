use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fastdraw_timing::PoolConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod host;

use app::App;

#[derive(Parser, Debug)]
#[command(
    name = "fast-draw",
    version,
    about = "Cowboy Fast Draw practice timer: three blinks, a random wait, then draw"
)]
struct Cli {
    /// JSON file overriding drill timings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the arming delay
    #[arg(long)]
    seed: Option<u64>,

    /// Threads running scheduled callbacks
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let pool = PoolConfig {
        worker_threads: cli.workers,
        ..PoolConfig::default()
    };

    let app = App::new(cli.config, cli.seed, pool)?;
    app.run()?;

    Ok(())
}
