//! Runtime game configuration loaded from TOML.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it
//! overrides. Defaults come from [`crate::constants`], which stays the
//! authoritative source.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ShieldOverflow;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub timing: TimingConfig,
    pub waves: WaveConfig,
    pub power_ups: PowerUpConfig,
    pub boss: BossConfig,
    pub combat: CombatConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Upper bound on the delta a single update may advance.
    pub max_delta_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub enemies_per_wave: u32,
    pub waves_per_level: u32,
    /// First level at which the per-level steps apply.
    pub step_start_level: u32,
    pub enemies_per_wave_step: u32,
    pub waves_per_level_step: u32,
    pub spawn_interval_ms: f64,
    /// Added to every spawn weight per level after the first.
    pub weight_step: f64,
    /// Base spawn weight per archetype name.
    pub spawn_weights: BTreeMap<String, f64>,
    pub ramp_start: f64,
    pub ramp_full_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub enabled: bool,
    pub common_weight: f64,
    pub rare_weight: f64,
    pub epic_weight: f64,
    /// `[min, max]` delay after spawning a pickup of each tier.
    pub common_interval_ms: [f64; 2],
    pub rare_interval_ms: [f64; 2],
    pub epic_interval_ms: [f64; 2],
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub damage_threshold: f64,
    pub shield_duration_ms: f64,
    pub shield_health: f64,
    pub shield_cooldown_ms: f64,
    pub damage_window_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub contact_damage: f64,
    pub shield_overflow: ShieldOverflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub switch_countdown_ms: f64,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_delta_ms: MAX_DELTA_MS,
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        let spawn_weights = [
            ("kamikaze", KAMIKAZE_WEIGHT),
            ("assault", ASSAULT_WEIGHT),
            ("tank", TANK_WEIGHT),
            ("laser", LASER_WEIGHT),
        ]
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight))
        .collect();

        Self {
            enemies_per_wave: ENEMIES_PER_WAVE,
            waves_per_level: WAVES_PER_LEVEL,
            step_start_level: WAVE_STEP_START_LEVEL,
            enemies_per_wave_step: ENEMIES_PER_WAVE_STEP,
            waves_per_level_step: WAVES_PER_LEVEL_STEP,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            weight_step: SPAWN_WEIGHT_STEP,
            spawn_weights,
            ramp_start: DIFFICULTY_RAMP_START,
            ramp_full_level: DIFFICULTY_RAMP_FULL_LEVEL,
        }
    }
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            common_weight: COMMON_WEIGHT,
            rare_weight: RARE_WEIGHT,
            epic_weight: EPIC_WEIGHT,
            common_interval_ms: [COMMON_INTERVAL_MS.0, COMMON_INTERVAL_MS.1],
            rare_interval_ms: [RARE_INTERVAL_MS.0, RARE_INTERVAL_MS.1],
            epic_interval_ms: [EPIC_INTERVAL_MS.0, EPIC_INTERVAL_MS.1],
            duration_ms: POWER_UP_DURATION_MS,
        }
    }
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            damage_threshold: BOSS_SHIELD_THRESHOLD,
            shield_duration_ms: BOSS_SHIELD_MS,
            shield_health: BOSS_SHIELD_HEALTH,
            shield_cooldown_ms: BOSS_SHIELD_COOLDOWN_MS,
            damage_window_ms: BOSS_DAMAGE_WINDOW_MS,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            contact_damage: CONTACT_DAMAGE,
            shield_overflow: ShieldOverflow::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            switch_countdown_ms: SWITCH_PLAYER_MS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        positive("playfield.width", self.playfield.width)?;
        positive("playfield.height", self.playfield.height)?;
        positive("timing.max_delta_ms", self.timing.max_delta_ms)?;
        positive("waves.spawn_interval_ms", self.waves.spawn_interval_ms)?;
        if self.waves.enemies_per_wave == 0 {
            return Err(SimError::InvalidConfig {
                field: "waves.enemies_per_wave",
                expected: "at least 1",
            });
        }
        if self.waves.waves_per_level == 0 {
            return Err(SimError::InvalidConfig {
                field: "waves.waves_per_level",
                expected: "at least 1",
            });
        }
        if self.waves.spawn_weights.is_empty() {
            return Err(SimError::InvalidConfig {
                field: "waves.spawn_weights",
                expected: "a non-empty table",
            });
        }
        if self.waves.spawn_weights.values().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::InvalidConfig {
                field: "waves.spawn_weights",
                expected: "finite and non-negative",
            });
        }
        let rarity_total =
            self.power_ups.common_weight + self.power_ups.rare_weight + self.power_ups.epic_weight;
        positive("power_ups weights", rarity_total)?;
        for (field, [min, max]) in [
            ("power_ups.common_interval_ms", self.power_ups.common_interval_ms),
            ("power_ups.rare_interval_ms", self.power_ups.rare_interval_ms),
            ("power_ups.epic_interval_ms", self.power_ups.epic_interval_ms),
        ] {
            if !(min > 0.0 && min <= max) {
                return Err(SimError::InvalidConfig {
                    field,
                    expected: "0 < min <= max",
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            expected: "positive",
        })
    }
}
