//! Archetype-specific stat profiles.
//!
//! Consolidates per-archetype parameters for spawning and the behavior policies.

use skyfire_core::constants::*;
use skyfire_core::enums::EnemyArchetype;

/// Area damage an archetype releases when it starts dying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastProfile {
    pub radius: f64,
    pub damage: f64,
    /// Time for the radius to grow to full size.
    pub duration_ms: f64,
}

/// Stat profile for an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    pub max_hp: f64,
    /// Pixels per reference frame.
    pub speed: f64,
    /// Sprite scale; bounding box is frame size times this.
    pub scale: f64,
    pub score_value: u64,
    /// Distance at which pursuit stops, for archetypes that hold position.
    pub standoff: Option<f64>,
    pub death_blast: Option<BlastProfile>,
    /// Whether the low-level difficulty ramp applies.
    pub ramped: bool,
}

/// Get the stat profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> ArchetypeProfile {
    match archetype {
        EnemyArchetype::Kamikaze => ArchetypeProfile {
            max_hp: KAMIKAZE_HP,
            speed: KAMIKAZE_SPEED,
            scale: KAMIKAZE_SCALE,
            score_value: KAMIKAZE_SCORE,
            standoff: None,
            death_blast: Some(BlastProfile {
                radius: KAMIKAZE_BLAST_RADIUS,
                damage: KAMIKAZE_BLAST_DAMAGE,
                duration_ms: KAMIKAZE_BLAST_MS,
            }),
            ramped: true,
        },
        EnemyArchetype::Assault => ArchetypeProfile {
            max_hp: ASSAULT_HP,
            speed: ASSAULT_SPEED,
            scale: ASSAULT_SCALE,
            score_value: ASSAULT_SCORE,
            standoff: Some(ASSAULT_STANDOFF),
            death_blast: None,
            ramped: true,
        },
        EnemyArchetype::Tank => ArchetypeProfile {
            max_hp: TANK_HP,
            speed: TANK_SPEED,
            scale: TANK_SCALE,
            score_value: TANK_SCORE,
            standoff: Some(TANK_STANDOFF),
            death_blast: Some(BlastProfile {
                radius: TANK_BLAST_RADIUS,
                damage: TANK_BLAST_DAMAGE,
                duration_ms: TANK_BLAST_MS,
            }),
            ramped: true,
        },
        EnemyArchetype::Laser => ArchetypeProfile {
            max_hp: LASER_HP,
            speed: LASER_SPEED,
            scale: LASER_SCALE,
            score_value: LASER_SCORE,
            standoff: None,
            death_blast: None,
            ramped: true,
        },
        EnemyArchetype::Boss => ArchetypeProfile {
            max_hp: BOSS_HP,
            speed: BOSS_SPEED,
            scale: BOSS_SCALE,
            score_value: BOSS_SCORE,
            standoff: None,
            death_blast: None,
            ramped: false,
        },
    }
}
