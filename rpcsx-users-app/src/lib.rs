//! Platform-agnostic application bootstrap for RPCSX user accounts.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter injection),
//! plus filesystem adapters in [`adapters`].

pub mod adapters;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rpcsx_users_core::error::{CoreError, CoreResult};
use rpcsx_users_core::services::{AccountRepository, ServiceContext};
use rpcsx_users_core::traits::{AccountStore, EmulatorBinding, LibraryRefresher, SettingsStore};

use adapters::{FsAccountStore, JsonSettingsStore, NoopEmulatorBinding, NoopLibraryRefresher};

/// Platform-agnostic application state.
///
/// Holds the `ServiceContext` and the account repository. Every frontend
/// constructs this once at startup via `AppStateBuilder` and shares it.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Account repository
    pub account_repository: Arc<AccountRepository>,
    /// Whether the initial account load has completed
    pub load_completed: AtomicBool,
}

impl AppState {
    /// Run the startup sequence: scan accounts and resolve the signed-in user.
    ///
    /// Failures are logged; the repository then starts from an empty snapshot.
    /// Sets `load_completed` to `true` when done.
    pub async fn run_startup(&self) {
        match self.account_repository.load().await {
            Ok(active_user) => {
                log::info!(
                    "Account load complete: {} account(s), active user {active_user}",
                    self.account_repository.accounts().len()
                );
            }
            Err(e) if e.is_expected() => log::warn!("Failed to load accounts: {e}"),
            Err(e) => log::error!("Failed to load accounts: {e}"),
        }
        self.load_completed.store(true, Ordering::SeqCst);
    }

    /// Whether `run_startup` has finished
    pub fn is_loaded(&self) -> bool {
        self.load_completed.load(Ordering::SeqCst)
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `account_store` — where account directories live
/// - `settings_store` — where the active user is persisted
///
/// # Optional
/// - `emulator` — defaults to `NoopEmulatorBinding`
/// - `library` — defaults to `NoopLibraryRefresher`
pub struct AppStateBuilder {
    account_store: Option<Arc<dyn AccountStore>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    emulator: Option<Arc<dyn EmulatorBinding>>,
    library: Option<Arc<dyn LibraryRefresher>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            account_store: None,
            settings_store: None,
            emulator: None,
            library: None,
        }
    }

    /// Filesystem defaults: accounts under `<hdd0_dir>/home`, settings in `settings_path`.
    #[must_use]
    pub fn filesystem(hdd0_dir: &Path, settings_path: &Path) -> Self {
        Self::new()
            .account_store(Arc::new(FsAccountStore::from_hdd0(hdd0_dir)))
            .settings_store(Arc::new(JsonSettingsStore::new(settings_path)))
    }

    #[must_use]
    pub fn account_store(mut self, store: Arc<dyn AccountStore>) -> Self {
        self.account_store = Some(store);
        self
    }

    #[must_use]
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    #[must_use]
    pub fn emulator(mut self, emulator: Arc<dyn EmulatorBinding>) -> Self {
        self.emulator = Some(emulator);
        self
    }

    #[must_use]
    pub fn library(mut self, library: Arc<dyn LibraryRefresher>) -> Self {
        self.library = Some(library);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let account_store = self.account_store.ok_or_else(|| {
            CoreError::ValidationError("account_store is required".to_string())
        })?;
        let settings_store = self.settings_store.ok_or_else(|| {
            CoreError::ValidationError("settings_store is required".to_string())
        })?;
        let emulator = self
            .emulator
            .unwrap_or_else(|| Arc::new(NoopEmulatorBinding));
        let library = self
            .library
            .unwrap_or_else(|| Arc::new(NoopLibraryRefresher));

        let ctx = Arc::new(ServiceContext::new(
            account_store,
            settings_store,
            emulator,
            library,
        ));
        let account_repository = Arc::new(AccountRepository::new(Arc::clone(&ctx)));

        Ok(AppState {
            ctx,
            account_repository,
            load_completed: AtomicBool::new(false),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
