//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the start of the next update.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible host-side player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Setup ---
    /// Pick the ship for the active player. Only accepted before play starts.
    ChooseShip { ship: ShipType },

    // --- Upgrade menu ---
    /// Take one of the offered upgrades (index into the offer list).
    SelectUpgrade { index: usize },

    // --- Simulation control ---
    Pause,
    Resume,
}
