//! Platform-agnostic storage adapters for desktop and CLI frontends.

mod fs_account_store;
mod json_settings_store;
mod noop;

pub use fs_account_store::FsAccountStore;
pub use json_settings_store::JsonSettingsStore;
pub use noop::{NoopEmulatorBinding, NoopLibraryRefresher};
