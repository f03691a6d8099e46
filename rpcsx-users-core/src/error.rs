//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Identifier is not exactly 8 ASCII digits
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Username does not match `[A-Za-z0-9_]{3,16}`
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Every identifier in the 8-digit space is taken
    #[error("No free user id left (max {max})")]
    CapacityExhausted { max: u32 },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Settings store error
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// Emulator binding error
    #[error("Emulator error: {0}")]
    EmulatorError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AccountNotFound(_)
            | Self::InvalidUserId(_)
            | Self::InvalidUsername(_)
            | Self::ValidationError(_) => true,
            Self::CapacityExhausted { .. }
            | Self::StorageError(_)
            | Self::SettingsError(_)
            | Self::EmulatorError(_)
            | Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
