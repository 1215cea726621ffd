//! Sprite metadata supplied by the host's asset provider.
//!
//! The simulation never touches image data. It only needs each sheet's frame
//! count and frame dimensions to size bounding boxes and wrap animations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skyfire_core::constants::DEFAULT_FRAME_SIZE;
use skyfire_core::enums::{EnemyArchetype, ShipType};
use skyfire_core::error::{SimError, SimResult};
use skyfire_core::types::Size;

/// Sprite key for falling power-up pickups.
pub const POWER_UP_SPRITE: &str = "power_up";

/// Frame layout of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub frame_count: u32,
    pub frame_width: f64,
    pub frame_height: f64,
}

impl SpriteSheet {
    pub fn new(frame_count: u32, frame_width: f64, frame_height: f64) -> Self {
        Self {
            frame_count,
            frame_width,
            frame_height,
        }
    }

    /// Bounding box of the sprite drawn at `scale`.
    pub fn scaled(&self, scale: f64) -> Size {
        Size::new(self.frame_width * scale, self.frame_height * scale)
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::new(1, DEFAULT_FRAME_SIZE, DEFAULT_FRAME_SIZE)
    }
}

/// All sprite sheets known to the session, keyed by sprite key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    sheets: BTreeMap<String, SpriteSheet>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with a square sheet of `frame_count` frames for every required key.
    pub fn with_defaults(frame_count: u32) -> Self {
        let mut catalog = Self::new();
        for key in Self::required_keys() {
            catalog.insert(
                key,
                SpriteSheet::new(frame_count, DEFAULT_FRAME_SIZE, DEFAULT_FRAME_SIZE),
            );
        }
        catalog
    }

    /// Every key the simulation asks for.
    pub fn required_keys() -> Vec<&'static str> {
        let ships = [ShipType::Assault, ShipType::Laser, ShipType::Tank]
            .into_iter()
            .map(|ship| ship.sprite_key());
        let enemies = EnemyArchetype::WAVE
            .into_iter()
            .chain(std::iter::once(EnemyArchetype::Boss))
            .map(|archetype| archetype.sprite_key());
        ships
            .chain(enemies)
            .chain(std::iter::once(POWER_UP_SPRITE))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, sheet: SpriteSheet) {
        self.sheets.insert(key.into(), sheet);
    }

    pub fn get(&self, key: &str) -> Option<&SpriteSheet> {
        self.sheets.get(key)
    }

    /// Sheet for `key`, or a single-frame default when it is missing.
    /// Only reachable for a missing key if `validate` was skipped.
    pub fn sheet(&self, key: &str) -> SpriteSheet {
        self.get(key).copied().unwrap_or_default()
    }

    /// Check that every required key is present with usable dimensions.
    pub fn validate(&self) -> SimResult<()> {
        for key in Self::required_keys() {
            let Some(sheet) = self.get(key) else {
                return Err(SimError::AssetLoad {
                    key: key.to_string(),
                    reason: "missing".to_string(),
                });
            };
            if sheet.frame_count == 0 {
                return Err(SimError::AssetLoad {
                    key: key.to_string(),
                    reason: "no frames".to_string(),
                });
            }
            let usable = |v: f64| v.is_finite() && v > 0.0;
            if !usable(sheet.frame_width) || !usable(sheet.frame_height) {
                return Err(SimError::AssetLoad {
                    key: key.to_string(),
                    reason: format!(
                        "invalid frame size {}x{}",
                        sheet.frame_width, sheet.frame_height
                    ),
                });
            }
        }
        Ok(())
    }
}
