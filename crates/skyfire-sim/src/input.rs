//! Input provider contract.
//!
//! The engine only asks three questions of the host's input layer; it never
//! sees raw device events.

use std::collections::HashSet;

use skyfire_core::enums::Action;
use skyfire_core::types::Position;

pub trait InputProvider {
    /// Whether the action is currently held.
    fn is_action_active(&self, action: Action) -> bool;

    /// Whether the action was pressed since the last query. Consumes the press.
    fn is_action_triggered_once(&mut self, action: Action) -> bool;

    /// Absolute pointer or touch position, if one is down.
    fn pointer_position(&self) -> Option<Position>;
}

/// Simple held/pressed set, used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    pointer: Option<Position>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    pub fn set_pointer(&mut self, pointer: Option<Position>) {
        self.pointer = pointer;
    }
}

impl InputProvider for InputState {
    fn is_action_active(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn is_action_triggered_once(&mut self, action: Action) -> bool {
        self.pressed.remove(&action)
    }

    fn pointer_position(&self) -> Option<Position> {
        self.pointer
    }
}
