//! Core types and definitions for the SKYFIRE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, state snapshots, events, constants,
//! configuration and the damage rules every entity obeys.
//! It has no dependency on the ECS or any host framework.

pub mod collision;
pub mod combat;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
