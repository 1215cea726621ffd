//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via `mpsc` channel; the latest snapshot is stored in shared state
//! for polling. The loop ends at game over, after `max_ticks` updates, or on
//! `Shutdown`, and returns a `SessionReport`.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error, info};

use skyfire_core::commands::PlayerCommand;
use skyfire_core::enums::GamePhase;
use skyfire_core::state::GameStateSnapshot;
use skyfire_sim::assets::AssetCatalog;
use skyfire_sim::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::state::{shared_snapshot, GameLoopCommand, SessionReport, SharedSnapshot};

pub const TICK_RATE: u32 = 60;

/// Nominal duration of one update.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Frames per sprite sheet in the built-in catalog.
const SPRITE_FRAMES: u32 = 4;

/// Options for one headless session.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub sim: SimConfig,
    /// Stop after this many updates.
    pub max_ticks: u64,
    /// Sleep between updates to hold the tick rate.
    pub realtime: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            max_ticks: 36_000,
            realtime: false,
        }
    }
}

/// Handle to a running game loop thread.
pub struct GameLoopHandle {
    pub command_tx: mpsc::Sender<GameLoopCommand>,
    pub latest_snapshot: SharedSnapshot,
    thread: JoinHandle<SessionReport>,
}

impl GameLoopHandle {
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| anyhow!("failed to send command: {e}"))
    }

    /// Ask the loop to stop after its current update.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
    }

    /// Wait for the loop to finish and return its report.
    pub fn join(self) -> Result<SessionReport> {
        self.thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(options: LoopOptions) -> Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = shared_snapshot();
    let shared = latest_snapshot.clone();

    let thread = std::thread::Builder::new()
        .name("skyfire-game-loop".into())
        .spawn(move || run_game_loop(options, cmd_rx, &shared))
        .context("failed to spawn game loop thread")?;

    Ok(GameLoopHandle {
        command_tx: cmd_tx,
        latest_snapshot,
        thread,
    })
}

/// The game loop. Runs until game over, the tick limit, Shutdown, or
/// channel disconnect.
pub fn run_game_loop(
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> SessionReport {
    let seed = options.sim.seed;
    let mut engine = SimulationEngine::new(options.sim);
    if let Err(err) = engine.load_assets(AssetCatalog::with_defaults(SPRITE_FRAMES)) {
        error!(%err, "session could not start");
        return SessionReport::from_engine(seed, 0, &engine);
    }
    engine.start();
    info!(seed, max_ticks = options.max_ticks, "game loop started");

    let dt_ms = TICK_DURATION.as_secs_f64() * 1000.0;
    let mut autopilot = Autopilot::new();
    let mut snapshot = engine.snapshot();
    let mut ticks = 0;
    let mut next_tick_time = Instant::now();

    'run: while ticks < options.max_ticks {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(ticks, "game loop shut down");
                    break 'run;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Menus and flight input from the autopilot
        if let Some(cmd) = autopilot.menu_command(&snapshot) {
            engine.queue_command(cmd);
        }
        engine.update(dt_ms, autopilot.next_input(&snapshot));
        ticks += 1;

        for event in engine.events() {
            debug!(?event, "game event");
        }

        // 3. Store latest snapshot for polling
        snapshot = engine.snapshot();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        if engine.phase() == GamePhase::GameOver {
            break;
        }

        // 4. Hold the tick rate
        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; reset instead of catching up
                next_tick_time = now;
            }
        }
    }

    let report = SessionReport::from_engine(seed, ticks, &engine);
    info!(
        ticks,
        phase = ?report.phase,
        score = report.stats.score,
        level = report.stats.level,
        "game loop finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::config::GameConfig;

    fn options(max_ticks: u64) -> LoopOptions {
        let mut game = GameConfig::default();
        game.power_ups.enabled = false;
        LoopOptions {
            sim: SimConfig {
                seed: 7,
                game,
                ..Default::default()
            },
            max_ticks,
            realtime: false,
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectUpgrade {
            index: 0,
        }))
        .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::SelectUpgrade { index: 0 })
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_headless_session_runs_to_limit() {
        let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
        let latest = shared_snapshot();
        let report = run_game_loop(options(300), rx, &latest);

        assert!(report.ticks <= 300);
        assert!(report.failure.is_none());
        assert_eq!(report.results.len(), 1);
        assert!(matches!(report.phase, GamePhase::Playing | GamePhase::GameOver));

        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.level, 1, "autopilot took the initial upgrade");
        assert!(snapshot.clock.tick > 0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let run = || {
            let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
            let report = run_game_loop(options(600), rx, &shared_snapshot());
            serde_json::to_string(&report).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_shutdown_before_first_update() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let report = run_game_loop(options(300), rx, &shared_snapshot());
        assert_eq!(report.ticks, 0);
        assert_eq!(report.phase, GamePhase::InitialUpgrade);
    }

    #[test]
    fn test_pause_command_freezes_clock() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        let latest = shared_snapshot();
        let report = run_game_loop(options(30), rx, &latest);

        assert_eq!(report.ticks, 30);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert!(snapshot.paused);
        assert_eq!(snapshot.clock.tick, 0);
    }

    #[test]
    fn test_spawned_loop_joins() {
        let handle = spawn_game_loop(options(120)).unwrap();
        let latest = handle.latest_snapshot.clone();
        let report = handle.join().unwrap();
        assert!(report.ticks > 0);
        assert!(latest.lock().unwrap().is_some());
    }

    #[test]
    fn test_tick_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
