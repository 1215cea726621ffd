//! Game state snapshot: the read-only view a draw pass consumes after each update.

use serde::{Deserialize, Serialize};

use crate::components::{ProjectileKind, ShipStats, Star};
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimClock, Size};

/// Complete visible state after an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub clock: SimClock,
    pub phase: GamePhase,
    pub paused: bool,
    pub level: u32,
    pub wave: u32,
    pub total_waves: u32,
    pub boss_active: bool,
    pub active_player: usize,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub power_ups: Vec<PowerUpView>,
    pub stars: Vec<Star>,
    pub upgrade_options: Vec<UpgradeOption>,
    pub stats: SessionStats,
    pub results: Vec<PlayerResult>,
    /// Remaining hot-seat countdown (only in `SwitchingPlayer`).
    pub switch_countdown_ms: f64,
    /// Why the session ended before starting, if it did.
    pub failure: Option<String>,
    pub events: Vec<GameEvent>,
}

/// The player's ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub ship: ShipType,
    pub position: Position,
    pub size: Size,
    pub angle: f64,
    pub state: Lifecycle,
    pub frame: u32,
    pub hp: f64,
    pub max_hp: f64,
    pub shield_active: bool,
    pub shield_hp: f64,
    pub active_power_up: Option<ActivePowerUpView>,
    pub stats: ShipStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePowerUpView {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
}

/// An enemy on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub archetype: EnemyArchetype,
    pub position: Position,
    pub size: Size,
    pub angle: f64,
    pub state: Lifecycle,
    /// Alive frame while alive, destruction frame afterwards.
    pub frame: u32,
    pub hp: f64,
    pub max_hp: f64,
    pub shield_active: bool,
    /// Current radius of an exploding death blast.
    pub blast_radius: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub owner: Owner,
    pub position: Position,
    pub size: Size,
    pub angle: f64,
    pub kind: ProjectileKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub position: Position,
    pub size: Size,
}

/// One upgrade offered at a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub kind: UpgradeKind,
    pub value: f64,
    pub description: String,
}

/// Running statistics, frozen at game over for score submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub level: u32,
    pub enemies_destroyed: u32,
    pub total_game_time_ms: f64,
    pub power_ups_collected: u32,
}

/// Final standing of one hot-seat player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub name: String,
    pub ship: ShipType,
    pub score: u64,
}
