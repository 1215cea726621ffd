//! Timed power-up drops: rarity roll, kind pick, and the spawn interval.

use rand::Rng;

use skyfire_core::config::PowerUpConfig;
use skyfire_core::enums::{PowerUpKind, Rarity};

/// Countdown to the next pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpScheduler {
    pub next_spawn_ms: f64,
}

impl PowerUpScheduler {
    /// First drop arrives after a common-band interval.
    pub fn new<R: Rng + ?Sized>(config: &PowerUpConfig, rng: &mut R) -> Self {
        Self {
            next_spawn_ms: interval_for(config, Rarity::Common, rng),
        }
    }

    /// Count down; returns the kind to drop when the interval elapses and
    /// re-rolls the next interval from the dropped tier's band.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        config: &PowerUpConfig,
        dt_ms: f64,
        rng: &mut R,
    ) -> Option<PowerUpKind> {
        if !config.enabled {
            return None;
        }
        self.next_spawn_ms -= dt_ms;
        if self.next_spawn_ms > 0.0 {
            return None;
        }
        let rarity = roll_rarity(config, rng);
        let kind = pick_kind(rarity, rng);
        self.next_spawn_ms = interval_for(config, rarity, rng);
        Some(kind)
    }
}

/// Weighted rarity roll. Falls back to common when all weights are zero.
pub fn roll_rarity<R: Rng + ?Sized>(config: &PowerUpConfig, rng: &mut R) -> Rarity {
    let weights = [
        (Rarity::Common, config.common_weight.max(0.0)),
        (Rarity::Rare, config.rare_weight.max(0.0)),
        (Rarity::Epic, config.epic_weight.max(0.0)),
    ];
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Rarity::Common;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (rarity, weight) in weights {
        if roll < weight {
            return rarity;
        }
        roll -= weight;
    }
    Rarity::Epic
}

/// Uniform pick among the kinds of one tier.
pub fn pick_kind<R: Rng + ?Sized>(rarity: Rarity, rng: &mut R) -> PowerUpKind {
    let kinds: Vec<PowerUpKind> = PowerUpKind::of_rarity(rarity).collect();
    if kinds.is_empty() {
        return PowerUpKind::Heal;
    }
    kinds[rng.gen_range(0..kinds.len())]
}

pub fn interval_for<R: Rng + ?Sized>(config: &PowerUpConfig, rarity: Rarity, rng: &mut R) -> f64 {
    let [min, max] = match rarity {
        Rarity::Common => config.common_interval_ms,
        Rarity::Rare => config.rare_interval_ms,
        Rarity::Epic => config.epic_interval_ms,
    };
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
