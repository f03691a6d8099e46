//! Storage and collaborator abstraction trait definition

mod account_store;
mod emulator_binding;
mod settings_store;

pub use account_store::{AccountEntry, AccountStore, MarkerFile, ACCOUNT_SUBDIRS, USERNAME_FILE};
pub use emulator_binding::{EmulatorBinding, LibraryRefresher};
pub use settings_store::{SettingsStore, ACTIVE_USER_KEY};
