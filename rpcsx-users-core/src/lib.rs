//! RPCSX Users Core Library
//!
//! Provides the account management logic of the emulator front-end:
//! - Account repository (in-memory snapshot of the on-disk `home/` tree)
//! - Naming rules for account identifiers and usernames
//! - Collaborator traits for storage, settings, the emulator binding and the game library
//!
//! The library is platform-independent. Filesystem and settings access is abstracted
//! through traits so that desktop, Android and CLI frontends can plug in their own adapters.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{AccountRepository, ServiceContext};
pub use traits::{AccountStore, EmulatorBinding, LibraryRefresher, SettingsStore};
