//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems and in
//! `combat`, not here; the only methods are geometry accessors.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, Rect, Size, Velocity};

/// Bounding box and facing of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner.
    pub position: Position,
    pub size: Size,
    /// Facing angle in radians, for rendering only.
    pub angle: f64,
}

/// Hit points and lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
    pub state: Lifecycle,
}

/// Looping sprite animation while alive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub frame: u32,
    pub frame_count: u32,
    pub timer_ms: f64,
    pub frame_ms: f64,
}

/// Destruction animation, played once while dying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destruction {
    pub frame: u32,
    pub frame_count: u32,
    pub timer_ms: f64,
    pub frame_ms: f64,
}

/// Damage-absorbing shield with its own health pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    pub health: f64,
    pub max_health: f64,
    /// How long an activation lasts. `None` means until depleted.
    pub duration_ms: Option<f64>,
    pub remaining_ms: f64,
    /// Time after deactivation before the shield may raise again.
    pub cooldown_ms: f64,
    pub cooldown_remaining_ms: f64,
    /// Automatic activation on accumulated damage (boss only).
    pub trigger: Option<ShieldTrigger>,
}

/// Raises the shield once damage taken within the last `window_ms`
/// exceeds `threshold`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldTrigger {
    pub threshold: f64,
    pub window_ms: f64,
    /// Hits still inside the window, oldest first.
    pub recent_hits: Vec<RecentHit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecentHit {
    pub amount: f64,
    pub age_ms: f64,
}

/// Enemy identity and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
    /// Speed after the difficulty ramp, pixels per reference frame.
    pub speed: f64,
    /// Score value after the difficulty ramp; awarded times the level.
    pub score_value: u64,
}

/// Area damage released when the owner starts dying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathBlast {
    pub radius: f64,
    pub damage: f64,
    /// Time for the radius to grow from zero to `radius`.
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    /// Set when the owner enters dying.
    pub armed: bool,
    /// Set once the blast has damaged the player.
    pub landed: bool,
}

/// Projectile state shared by all variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Owner,
    pub damage: f64,
    /// Inert once set; pruned before the next tick.
    pub destroyed: bool,
    pub lifetime_ms: Option<f64>,
    pub kind: ProjectileKind,
}

/// Variant-specific projectile fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectileKind {
    /// Constant velocity. `spin` rotates the sprite per reference frame.
    Straight { spin: f64 },
    /// Steers toward its target, turning at most `turn_rate` per reference frame.
    Homing { speed: f64, turn_rate: f64 },
    /// Grows in place for `charge_remaining_ms`, then flies at the point
    /// captured when it was fired.
    Charged {
        charge_remaining_ms: f64,
        radius: f64,
        max_radius: f64,
        speed: f64,
        target: Position,
    },
    /// Flies to `target` and detonates once within one step of it.
    Grenade {
        target: Position,
        blast_radius: f64,
        detonated: bool,
        /// Blast has been checked against the player.
        resolved: bool,
        explosion_remaining_ms: f64,
    },
    /// Continuous beam anchored to its owner.
    Beam {
        angle: f64,
        width: f64,
        length: f64,
        remaining_ms: f64,
        hit_interval_ms: f64,
        /// Accumulated time not yet converted into hits.
        hit_timer_ms: f64,
    },
}

/// A falling pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub fall_speed: f64,
    /// Set before the effect is applied so a pickup can only apply once.
    pub collected: bool,
}

/// Player ship statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub max_hp: f64,
    pub speed: f64,
    pub bullet_damage: f64,
    pub shot_cooldown_ms: f64,
    pub projectile_speed: f64,
}

/// Cosmetic background star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub position: Position,
    pub size: f64,
    pub speed: f64,
}

impl Body {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            angle: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn center(&self) -> Position {
        self.rect().center()
    }
}

/// Request to add a projectile to the world, produced by shoot and attack
/// policies. Not stored as a component itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub body: Body,
    pub velocity: Velocity,
    pub projectile: Projectile,
    /// Whether the projectile follows the entity that fired it (beams).
    pub anchored: bool,
}
