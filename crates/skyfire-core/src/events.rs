//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Something noteworthy that happened during an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    LevelStarted { level: u32 },
    WaveStarted { level: u32, wave: u32, enemies: u32 },
    EnemySpawned { archetype: EnemyArchetype },
    /// A spawn request named something the simulation does not know.
    SpawnSkipped { name: String },
    /// Enemy went from alive to dying; `score` already includes the level multiplier.
    EnemyDestroyed { archetype: EnemyArchetype, score: u64 },
    BossSpawned { level: u32 },
    BossDefeated { level: u32 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    PlayerHit { damage: f64, hp: f64 },
    PlayerDefeated { player: usize },
    PlayerSwitched { player: usize },
    UpgradeApplied { kind: UpgradeKind, value: f64 },
    GameOver { score: u64 },
}
