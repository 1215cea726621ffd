//! State shared between the CLI and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use skyfire_core::commands::PlayerCommand;
use skyfire_core::enums::{GamePhase, ShipType};
use skyfire_core::state::{GameStateSnapshot, PlayerResult, SessionStats};
use skyfire_sim::{SeatConfig, SimulationEngine};

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after every update.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

/// Outcome of a headless session, printed as JSON when the loop exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub seed: u64,
    /// Updates the loop ran, including paused ones.
    pub ticks: u64,
    pub phase: GamePhase,
    pub stats: SessionStats,
    pub results: Vec<PlayerResult>,
    pub failure: Option<String>,
}

impl SessionReport {
    pub fn from_engine(seed: u64, ticks: u64, engine: &SimulationEngine) -> Self {
        Self {
            seed,
            ticks,
            phase: engine.phase(),
            stats: engine.final_stats().unwrap_or_else(|| engine.stats()),
            results: engine.results(),
            failure: engine.failure().map(str::to_string),
        }
    }

    /// Highest individual score, if anyone played.
    pub fn best(&self) -> Option<&PlayerResult> {
        self.results.iter().max_by_key(|r| r.score)
    }
}

/// Parse a hot-seat entry of the form `NAME:SHIP` (ship defaults to assault).
pub fn parse_seat(arg: &str) -> Result<SeatConfig, String> {
    let (name, ship) = match arg.split_once(':') {
        Some((name, ship)) => (name.trim(), ship.parse::<ShipType>().map_err(|e| e.to_string())?),
        None => (arg.trim(), ShipType::default()),
    };
    if name.is_empty() {
        return Err(format!("player '{arg}' has no name"));
    }
    Ok(SeatConfig::new(name, ship))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_sim::SimConfig;

    #[test]
    fn test_parse_seat() {
        let seat = parse_seat("Alice:tank").unwrap();
        assert_eq!(seat.name, "Alice");
        assert_eq!(seat.ship, ShipType::Tank);

        let seat = parse_seat("Bob").unwrap();
        assert_eq!(seat.ship, ShipType::Assault);

        assert!(parse_seat("Carol:zeppelin").is_err());
        assert!(parse_seat(":laser").is_err());
    }

    #[test]
    fn test_report_from_fresh_engine() {
        let engine = SimulationEngine::new(SimConfig::default());
        let report = SessionReport::from_engine(42, 0, &engine);
        assert_eq!(report.phase, GamePhase::Loading);
        assert_eq!(report.results.len(), 1);
        assert!(report.failure.is_none());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"seed\":42"));
    }

    #[test]
    fn test_shared_snapshot_starts_empty() {
        let shared = shared_snapshot();
        assert!(shared.lock().unwrap().is_none());
    }
}
