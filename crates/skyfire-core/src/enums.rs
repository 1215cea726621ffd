//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Entity lifecycle. Transitions only run forward: alive, dying, dead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Playing the destruction animation. No movement or attacks.
    Dying,
    /// Animation finished, eligible for removal.
    Dead,
}

/// Enemy archetype category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    /// Pursues the player and bursts on death.
    Kamikaze,
    /// Holds a stand-off distance and fires three-round bursts.
    Assault,
    /// Slow pursuit, lobs grenade volleys, explodes on death.
    Tank,
    /// Charges and fires a screen-spanning beam, then repositions.
    Laser,
    /// End-of-level enemy with rotating attacks and a self-shield.
    Boss,
}

impl EnemyArchetype {
    /// Archetypes that appear in regular waves.
    pub const WAVE: [EnemyArchetype; 4] = [
        EnemyArchetype::Kamikaze,
        EnemyArchetype::Assault,
        EnemyArchetype::Tank,
        EnemyArchetype::Laser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnemyArchetype::Kamikaze => "kamikaze",
            EnemyArchetype::Assault => "assault",
            EnemyArchetype::Tank => "tank",
            EnemyArchetype::Laser => "laser",
            EnemyArchetype::Boss => "boss",
        }
    }

    /// Sprite sheet key in the asset catalog.
    pub fn sprite_key(&self) -> &'static str {
        match self {
            EnemyArchetype::Kamikaze => "enemy_kamikaze",
            EnemyArchetype::Assault => "enemy_assault",
            EnemyArchetype::Tank => "enemy_tank",
            EnemyArchetype::Laser => "enemy_laser",
            EnemyArchetype::Boss => "enemy_boss",
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyArchetype::Boss)
    }
}

impl fmt::Display for EnemyArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyArchetype {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kamikaze" => Ok(EnemyArchetype::Kamikaze),
            "assault" => Ok(EnemyArchetype::Assault),
            "tank" => Ok(EnemyArchetype::Tank),
            "laser" => Ok(EnemyArchetype::Laser),
            "boss" => Ok(EnemyArchetype::Boss),
            _ => Err(SimError::UnknownEnemy(s.to_string())),
        }
    }
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Power-up rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

/// Power-up effect type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Shield,
    LaserMode,
    TankMode,
    Boost,
    SpeedBoost,
    FireRateBoost,
    Heal,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::Shield,
        PowerUpKind::LaserMode,
        PowerUpKind::TankMode,
        PowerUpKind::Boost,
        PowerUpKind::SpeedBoost,
        PowerUpKind::FireRateBoost,
        PowerUpKind::Heal,
    ];

    pub fn rarity(&self) -> Rarity {
        match self {
            PowerUpKind::SpeedBoost | PowerUpKind::FireRateBoost => Rarity::Common,
            PowerUpKind::Shield | PowerUpKind::Heal => Rarity::Rare,
            PowerUpKind::LaserMode | PowerUpKind::TankMode | PowerUpKind::Boost => Rarity::Epic,
        }
    }

    /// Every kind belonging to `rarity`, in declaration order.
    pub fn of_rarity(rarity: Rarity) -> impl Iterator<Item = PowerUpKind> {
        Self::ALL.into_iter().filter(move |k| k.rarity() == rarity)
    }

    /// Timed kinds occupy the player's single power-up slot.
    pub fn is_timed(&self) -> bool {
        !matches!(self, PowerUpKind::Shield | PowerUpKind::Heal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::LaserMode => "laser_mode",
            PowerUpKind::TankMode => "tank_mode",
            PowerUpKind::Boost => "boost",
            PowerUpKind::SpeedBoost => "speed_boost",
            PowerUpKind::FireRateBoost => "fire_rate_boost",
            PowerUpKind::Heal => "heal",
        }
    }
}

impl FromStr for PowerUpKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| SimError::UnknownPowerUp(s.to_string()))
    }
}

/// Player ship selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipType {
    #[default]
    Assault,
    Laser,
    Tank,
}

impl ShipType {
    pub fn sprite_key(&self) -> &'static str {
        match self {
            ShipType::Assault => "player_assault",
            ShipType::Laser => "player_laser",
            ShipType::Tank => "player_tank",
        }
    }
}

impl FromStr for ShipType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assault" => Ok(ShipType::Assault),
            "laser" => Ok(ShipType::Laser),
            "tank" => Ok(ShipType::Tank),
            _ => Err(SimError::UnknownShip(s.to_string())),
        }
    }
}

/// Permanent upgrade offered at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Hp,
    Speed,
    BulletDamage,
    FireRate,
    ProjectileSpeed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Hp,
        UpgradeKind::Speed,
        UpgradeKind::BulletDamage,
        UpgradeKind::FireRate,
        UpgradeKind::ProjectileSpeed,
    ];
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Loading,
    InitialUpgrade,
    Playing,
    UpgradeMenu,
    /// Hot-seat countdown before the next player takes the ship.
    SwitchingPlayer,
    GameOver,
}

/// Input actions queried from the input provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
}

/// What happens to damage left over after a shield breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldOverflow {
    /// The breaking hit is fully absorbed.
    #[default]
    Discard,
    /// The excess reaches hit points in the same call.
    CarryOver,
}

/// Boss attack pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAttack {
    OrbRing,
    ChargedOrb,
    GunSpray,
}
