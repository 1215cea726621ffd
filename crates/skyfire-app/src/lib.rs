//! SKYFIRE headless host.
//!
//! Runs the simulation engine on its own thread, feeds it commands over a
//! channel, and drives the ship with a simple autopilot.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use skyfire_core as core;
