//! Abstract input events
//!
//! The presentation side translates keyboard/mouse state into these events.
//! They are edge-triggered: one event per press and one per release.

use serde::{Deserialize, Serialize};

/// What the input refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InputKind {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    FirePrimary,
    FireSecondary,
    Pause,
    Quit,
}

/// A single press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InputEvent {
    pub kind: InputKind,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(kind: InputKind) -> Self {
        Self {
            kind,
            pressed: true,
        }
    }

    pub fn release(kind: InputKind) -> Self {
        Self {
            kind,
            pressed: false,
        }
    }

    /// Quit ends the session regardless of press state
    pub fn is_quit(&self) -> bool {
        self.kind == InputKind::Quit
    }
}
