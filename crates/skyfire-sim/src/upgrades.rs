//! Permanent upgrades offered at level checkpoints.

use rand::seq::SliceRandom;
use rand::Rng;

use skyfire_core::components::ShipStats;
use skyfire_core::constants::*;
use skyfire_core::enums::UpgradeKind;
use skyfire_core::state::UpgradeOption;

/// Multiplier applied to upgrade values at `level`.
pub fn level_scale(level: u32) -> f64 {
    1.0 + UPGRADE_LEVEL_STEP * level.saturating_sub(1) as f64
}

pub fn base_value(kind: UpgradeKind) -> f64 {
    match kind {
        UpgradeKind::Hp => UPGRADE_HP,
        UpgradeKind::Speed => UPGRADE_SPEED,
        UpgradeKind::BulletDamage => UPGRADE_DAMAGE,
        UpgradeKind::FireRate => UPGRADE_FIRE_RATE_MS,
        UpgradeKind::ProjectileSpeed => UPGRADE_PROJECTILE_SPEED,
    }
}

pub fn describe(kind: UpgradeKind, value: f64) -> String {
    match kind {
        UpgradeKind::Hp => format!("+{value:.0} max HP"),
        UpgradeKind::Speed => format!("+{value:.1} speed"),
        UpgradeKind::BulletDamage => format!("+{value:.1} bullet damage"),
        UpgradeKind::FireRate => format!("-{value:.0} ms between shots"),
        UpgradeKind::ProjectileSpeed => format!("+{value:.1} projectile speed"),
    }
}

pub fn option(kind: UpgradeKind, level: u32) -> UpgradeOption {
    let value = base_value(kind) * level_scale(level);
    UpgradeOption {
        kind,
        value,
        description: describe(kind, value),
    }
}

/// Pick `UPGRADE_CHOICES` distinct upgrades scaled to `level`.
pub fn generate_options<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<UpgradeOption> {
    UpgradeKind::ALL
        .choose_multiple(rng, UPGRADE_CHOICES)
        .map(|&kind| option(kind, level))
        .collect()
}

/// Stats after taking `upgrade`. Does not touch current hit points.
pub fn apply(stats: ShipStats, upgrade: &UpgradeOption) -> ShipStats {
    let mut next = stats;
    match upgrade.kind {
        UpgradeKind::Hp => next.max_hp += upgrade.value,
        UpgradeKind::Speed => next.speed += upgrade.value,
        UpgradeKind::BulletDamage => next.bullet_damage += upgrade.value,
        UpgradeKind::FireRate => {
            next.shot_cooldown_ms = (next.shot_cooldown_ms - upgrade.value).max(MIN_SHOT_COOLDOWN_MS)
        }
        UpgradeKind::ProjectileSpeed => next.projectile_speed += upgrade.value,
    }
    next
}
