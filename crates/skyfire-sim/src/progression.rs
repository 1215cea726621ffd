//! Level and wave progression.
//!
//! A wave is a queue of archetype-name tokens built once, by weighted random
//! choice, when the wave starts. Tokens drain at a fixed interval. The wave is
//! complete when the queue is empty and no enemies remain; after the last wave
//! of a level the boss is released.

use std::collections::VecDeque;

use hecs::Entity;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{info, warn};

use skyfire_core::config::WaveConfig;
use skyfire_core::events::GameEvent;

/// Number of increments applied at `level`.
fn steps(config: &WaveConfig, level: u32) -> u32 {
    if level >= config.step_start_level {
        level - config.step_start_level + 1
    } else {
        0
    }
}

pub fn enemies_per_wave(config: &WaveConfig, level: u32) -> u32 {
    config.enemies_per_wave + steps(config, level) * config.enemies_per_wave_step
}

pub fn waves_per_level(config: &WaveConfig, level: u32) -> u32 {
    config.waves_per_level + steps(config, level) * config.waves_per_level_step
}

/// Spawn weights at `level`, each raised by the per-level step and capped at 1.
pub fn spawn_weights(config: &WaveConfig, level: u32) -> Vec<(String, f64)> {
    let bonus = config.weight_step * level.saturating_sub(1) as f64;
    config
        .spawn_weights
        .iter()
        .map(|(name, weight)| (name.clone(), (weight + bonus).clamp(0.0, 1.0)))
        .collect()
}

/// Stat multiplier for non-boss enemies: reduced at low levels, full from
/// `ramp_full_level` on.
pub fn difficulty_ramp(config: &WaveConfig, level: u32) -> f64 {
    let full = config.ramp_full_level.max(1);
    if level >= full || full == 1 {
        return 1.0;
    }
    let progress = level.saturating_sub(1) as f64 / (full - 1) as f64;
    (config.ramp_start + (1.0 - config.ramp_start) * progress).clamp(0.0, 1.0)
}

/// Build one wave's token queue.
pub fn build_wave_queue<R: Rng + ?Sized>(
    config: &WaveConfig,
    level: u32,
    rng: &mut R,
) -> VecDeque<String> {
    let weights = spawn_weights(config, level);
    let count = enemies_per_wave(config, level);
    let dist = match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => dist,
        Err(err) => {
            warn!(level, %err, "no usable spawn weights, wave is empty");
            return VecDeque::new();
        }
    };
    (0..count)
        .map(|_| weights[dist.sample(rng)].0.clone())
        .collect()
}

/// Outcome of a wave-completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveCheck {
    /// Wave still in progress, or the boss is up.
    Pending,
    NextWave,
    SpawnBoss,
}

#[derive(Debug, Clone, Default)]
pub struct Progression {
    pub level: u32,
    pub wave: u32,
    pub total_waves: u32,
    pub queue: VecDeque<String>,
    /// Time until the next token drains.
    pub spawn_timer_ms: f64,
    pub boss_active: bool,
    pub boss: Option<Entity>,
}

impl Progression {
    /// Enter `level` at wave 1 with a freshly built queue.
    pub fn start_level<R: Rng + ?Sized>(
        &mut self,
        config: &WaveConfig,
        level: u32,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        self.level = level.max(1);
        self.wave = 1;
        self.total_waves = waves_per_level(config, self.level);
        self.boss_active = false;
        self.boss = None;
        info!(level = self.level, waves = self.total_waves, "level started");
        events.push(GameEvent::LevelStarted { level: self.level });
        self.start_wave(config, rng, events);
    }

    fn start_wave<R: Rng + ?Sized>(
        &mut self,
        config: &WaveConfig,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        self.queue = build_wave_queue(config, self.level, rng);
        self.spawn_timer_ms = 0.0;
        info!(level = self.level, wave = self.wave, enemies = self.queue.len(), "wave started");
        events.push(GameEvent::WaveStarted {
            level: self.level,
            wave: self.wave,
            enemies: self.queue.len() as u32,
        });
    }

    /// Drain at most one token once the spawn interval has elapsed.
    pub fn next_token(&mut self, config: &WaveConfig, dt_ms: f64) -> Option<String> {
        if self.queue.is_empty() {
            return None;
        }
        self.spawn_timer_ms -= dt_ms;
        if self.spawn_timer_ms > 0.0 {
            return None;
        }
        self.spawn_timer_ms = config.spawn_interval_ms;
        self.queue.pop_front()
    }

    /// Advance at most one wave. Never advances while tokens remain, enemies
    /// remain, or the boss is up.
    pub fn check_wave_completion<R: Rng + ?Sized>(
        &mut self,
        enemies_remaining: usize,
        config: &WaveConfig,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> WaveCheck {
        if self.boss_active || !self.queue.is_empty() || enemies_remaining > 0 {
            return WaveCheck::Pending;
        }
        self.wave += 1;
        if self.wave > self.total_waves {
            self.boss_active = true;
            return WaveCheck::SpawnBoss;
        }
        self.start_wave(config, rng, events);
        WaveCheck::NextWave
    }
}
