//! Enemy AI for SKYFIRE.
//!
//! Per-archetype movement and attack policies, selected through a table of
//! function pointers. Operates on plain data; no ECS access.

pub mod fsm;
pub mod profiles;

pub use skyfire_core as core;

#[cfg(test)]
mod tests;
