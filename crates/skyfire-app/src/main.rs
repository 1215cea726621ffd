//! Headless SKYFIRE runner: plays a seeded session with the built-in
//! autopilot and prints the session report as JSON.
//!
//! Usage:
//!   cargo run -p skyfire-app -- --seed 7 --player Alice:tank --player Bob:laser
//!   RUST_LOG=skyfire_sim=debug cargo run -p skyfire-app -- --config skyfire.toml

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skyfire_app::game_loop::{spawn_game_loop, LoopOptions};
use skyfire_app::state::parse_seat;
use skyfire_core::config::GameConfig;
use skyfire_sim::{SeatConfig, SimConfig};

#[derive(Parser)]
#[command(name = "skyfire")]
#[command(about = "Run a headless SKYFIRE session driven by the autopilot")]
struct Args {
    /// TOML file overriding the default game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed; the same seed replays the same session
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many 60Hz updates
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Hot-seat player as NAME:SHIP (assault, laser, tank). Repeatable.
    #[arg(long = "player", value_parser = parse_seat)]
    players: Vec<SeatConfig>,

    /// Hold the loop to wall-clock 60Hz instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write the final snapshot to this file as JSON
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let game = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut sim = SimConfig {
        seed: args.seed,
        game,
        ..Default::default()
    };
    if !args.players.is_empty() {
        sim.players = args.players;
    }
    info!(seed = sim.seed, players = sim.players.len(), "starting session");

    let handle = spawn_game_loop(LoopOptions {
        sim,
        max_ticks: args.max_ticks,
        realtime: args.realtime,
    })?;
    let latest = handle.latest_snapshot.clone();
    let report = handle.join()?;

    if let Some(path) = &args.snapshot_out {
        let snapshot = latest
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot lock poisoned"))?
            .clone();
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(failure) = &report.failure {
        bail!("session failed: {failure}");
    }
    if let Some(best) = report.best() {
        info!(name = %best.name, score = best.score, "best score");
    }
    Ok(())
}
