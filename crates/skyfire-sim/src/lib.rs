//! Simulation engine for SKYFIRE.
//!
//! Owns the hecs ECS world, advances it by host-supplied deltas,
//! and produces GameStateSnapshots for the draw pass.

pub mod assets;
pub mod engine;
pub mod input;
pub mod player;
pub mod power_ups;
pub mod progression;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use engine::{SeatConfig, SimConfig, SimulationEngine};
pub use skyfire_core as core;
