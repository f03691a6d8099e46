//! Operation result types
//!
//! Mutating repository operations distinguish three results:
//! - the operation took effect (`Applied`)
//! - a best-effort step failed and was ignored (`Degraded`)
//! - the input was refused before anything changed (`Rejected`)
//!
//! Fatal failures are reported through `CoreError` instead.

use serde::Serialize;

use crate::error::CoreError;

/// Why an operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Identifier is not 8 ASCII digits (or is `00000000`)
    InvalidUserId,
    /// Username does not match `[A-Za-z0-9_]{3,16}`
    InvalidUsername,
    /// No backing directory for the identifier
    UnknownAccount,
    /// The signed-in account cannot be removed
    ActiveAccount,
    /// Target account is already signed in
    AlreadyActive,
    /// The emulator must be stopped before switching accounts
    EmulatorRunning,
}

impl Rejection {
    /// Convert into an error for callers that surface rejections (CLI, RPC).
    ///
    /// `subject` is the offending identifier or username.
    #[must_use]
    pub fn into_error(self, subject: &str) -> CoreError {
        match self {
            Self::InvalidUserId => CoreError::InvalidUserId(subject.to_string()),
            Self::InvalidUsername => CoreError::InvalidUsername(subject.to_string()),
            Self::UnknownAccount => CoreError::AccountNotFound(subject.to_string()),
            Self::ActiveAccount => {
                CoreError::ValidationError(format!("{subject} is the signed-in account"))
            }
            Self::AlreadyActive => {
                CoreError::ValidationError(format!("{subject} is already signed in"))
            }
            Self::EmulatorRunning => {
                CoreError::EmulatorError("emulator must be stopped first".to_string())
            }
        }
    }
}

/// Result of a mutating repository operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// The operation took full effect
    Applied,
    /// Refused before touching storage
    Rejected { reason: Rejection },
    /// Ran to completion, but best-effort steps failed and were ignored
    Degraded { warnings: Vec<String> },
}

impl OperationOutcome {
    #[must_use]
    pub fn rejected(reason: Rejection) -> Self {
        Self::Rejected { reason }
    }

    /// `Applied` when there are no warnings, `Degraded` otherwise
    #[must_use]
    pub fn from_warnings(warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            Self::Applied
        } else {
            Self::Degraded { warnings }
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// Result of `create_account`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountResult {
    /// Identifier assigned to the new account, `None` when rejected
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub outcome: OperationOutcome,
}
