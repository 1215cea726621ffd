//! ECS systems that operate on the simulation world each update.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only)
//! plus whatever context they need. They do not own state; all state lives in
//! components, the player, or the engine.

pub mod background;
pub mod cleanup;
pub mod collision;
pub mod enemy_ai;
pub mod lifecycle;
pub mod power_ups;
pub mod projectiles;
pub mod snapshot;
