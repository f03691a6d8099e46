//! Emulator state as reported by the native binding

use serde::{Deserialize, Serialize};

/// Emulator run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmulatorState {
    /// Nothing is running, accounts can be switched freely
    #[default]
    Stopped,
    Paused,
    Running,
    /// The binding could not report a state
    Unknown,
}

impl EmulatorState {
    #[must_use]
    pub fn is_stopped(self) -> bool {
        self == Self::Stopped
    }
}
