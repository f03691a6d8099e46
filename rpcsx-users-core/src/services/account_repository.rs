//! Account repository
//!
//! Keeps an in-memory snapshot of the accounts found under `home/` and the
//! signed-in user id. The on-disk tree is authoritative: every mutation ends
//! with a full rescan, and the snapshot is replaced wholesale, never patched.
//!
//! Scans are serialized by a single async mutex, so observers always see the
//! result of one completed scan.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{MarkerFile, ACTIVE_USER_KEY};
use crate::types::{
    Account, AccountKey, AccountsMap, CreateAccountResult, OperationOutcome, Rejection,
};
use crate::utils::validator::{
    fallback_username, is_valid_user_id, normalize_username, validate_username, DEFAULT_USER_ID,
};

/// Account repository service
pub struct AccountRepository {
    ctx: Arc<ServiceContext>,
    accounts: watch::Sender<Arc<AccountsMap>>,
    active_user: watch::Sender<String>,
    io_lock: Mutex<()>,
    /// Largest allocatable key
    max_key: u32,
}

impl AccountRepository {
    /// Create a repository with an empty snapshot; call `load()` to populate it.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            accounts: watch::Sender::new(Arc::new(AccountsMap::new())),
            active_user: watch::Sender::new(String::new()),
            io_lock: Mutex::new(()),
            max_key: AccountKey::MAX,
        }
    }

    /// Lower the allocation ceiling
    #[cfg(test)]
    fn with_max_key(mut self, max_key: u32) -> Self {
        self.max_key = max_key.clamp(AccountKey::MIN, AccountKey::MAX);
        self
    }

    // ===== Snapshots =====

    /// Current accounts snapshot
    #[must_use]
    pub fn accounts(&self) -> Arc<AccountsMap> {
        self.accounts.borrow().clone()
    }

    /// Accounts ordered by user id, for display
    #[must_use]
    pub fn sorted_accounts(&self) -> Vec<Account> {
        // Keys order numerically, which matches zero-padded id order
        self.accounts.borrow().values().cloned().collect()
    }

    /// Signed-in user id, empty until `load()` or `login_account()` runs
    #[must_use]
    pub fn active_user(&self) -> String {
        self.active_user.borrow().clone()
    }

    /// Receiver notified on every published scan
    #[must_use]
    pub fn subscribe_accounts(&self) -> watch::Receiver<Arc<AccountsMap>> {
        self.accounts.subscribe()
    }

    /// Receiver notified when the signed-in user changes
    #[must_use]
    pub fn subscribe_active_user(&self) -> watch::Receiver<String> {
        self.active_user.subscribe()
    }

    /// Display name of `user_id` in the current snapshot
    #[must_use]
    pub fn get_username(&self, user_id: &str) -> Option<String> {
        let key = AccountKey::from_user_id(user_id)?;
        self.accounts
            .borrow()
            .get(&key)
            .map(|account| account.username.clone())
    }

    fn contains(&self, key: AccountKey) -> bool {
        self.accounts.borrow().contains_key(&key)
    }

    // ===== Refresh =====

    /// Rescan the accounts root and publish the result
    pub async fn refresh(&self) -> CoreResult<()> {
        let guard = self.io_lock.lock().await;
        self.publish_scan(&guard).await.map(|_| ())
    }

    /// Scan and publish. Requires the I/O lock.
    async fn publish_scan(&self, _guard: &MutexGuard<'_, ()>) -> CoreResult<Arc<AccountsMap>> {
        let fresh = Arc::new(self.scan().await?);
        log::debug!("Account scan found {} account(s)", fresh.len());
        self.accounts.send_replace(Arc::clone(&fresh));
        Ok(fresh)
    }

    async fn scan(&self) -> CoreResult<AccountsMap> {
        let store = self.ctx.account_store();
        let mut accounts = AccountsMap::new();

        for entry in store.list_entries().await? {
            let Some(key) = AccountKey::from_user_id(&entry.dir_name) else {
                log::debug!("Skipping non-account directory: {}", entry.dir_name);
                continue;
            };

            let user_id = key.to_user_id();
            let fallback = fallback_username(&user_id);
            let username = match entry.marker {
                MarkerFile::Missing => {
                    log::debug!("Skipping {user_id}: no username file");
                    continue;
                }
                MarkerFile::Unreadable => {
                    log::warn!("Username file of {user_id} is unreadable, using {fallback}");
                    fallback
                }
                MarkerFile::Contents(raw) => normalize_username(&raw, &fallback),
            };

            accounts.insert(key, Account::new(key, entry.path, username));
        }

        Ok(accounts)
    }

    // ===== Startup =====

    /// Refresh, then resolve the signed-in user.
    ///
    /// Resolution order: emulator report, settings, smallest present id,
    /// `00000001`. The first two only count when the account exists on disk.
    pub async fn load(&self) -> CoreResult<String> {
        self.refresh().await?;

        let from_emulator = match self.ctx.emulator().get_user().await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Failed to query emulator user: {e}");
                None
            }
        };
        let from_settings = self.read_active_user_setting().await;

        let resolved = resolve_active_user(
            &self.accounts(),
            from_emulator.as_deref(),
            from_settings.as_deref(),
        );

        self.active_user.send_if_modified(|current| {
            if *current == resolved {
                false
            } else {
                current.clone_from(&resolved);
                true
            }
        });
        log::info!("Active user resolved to {resolved}");

        Ok(resolved)
    }

    /// Persisted active user id, `00000001` when unset or malformed
    pub async fn get_user_from_settings(&self) -> String {
        self.read_active_user_setting()
            .await
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
    }

    async fn read_active_user_setting(&self) -> Option<String> {
        match self.ctx.settings_store().get(ACTIVE_USER_KEY).await {
            Ok(value) => value.filter(|id| is_valid_user_id(id)),
            Err(e) => {
                log::warn!("Failed to read {ACTIVE_USER_KEY} setting: {e}");
                None
            }
        }
    }

    // ===== Mutations =====

    /// Create an account in the first free slot.
    ///
    /// Allocation and directory creation run under the I/O lock, so concurrent
    /// creations never pick the same id.
    pub async fn create_account(&self, username: &str) -> CoreResult<CreateAccountResult> {
        if !validate_username(username) {
            log::debug!("Rejected account creation, invalid username: {username:?}");
            return Ok(CreateAccountResult {
                user_id: None,
                outcome: OperationOutcome::rejected(Rejection::InvalidUsername),
            });
        }

        let guard = self.io_lock.lock().await;
        let current = self.publish_scan(&guard).await?;

        let key = next_free_key(current.keys().copied(), self.max_key)
            .ok_or(CoreError::CapacityExhausted { max: self.max_key })?;
        let user_id = key.to_user_id();

        log::info!("Creating account {user_id} ({username})");
        let created = self
            .ctx
            .account_store()
            .create_account_dir(&user_id, username)
            .await;

        // Publish whatever made it to disk, even on failure
        self.publish_scan(&guard).await?;
        if let Err(e) = created {
            log::error!("Failed to create account {user_id}: {e}");
            return Err(e);
        }

        Ok(CreateAccountResult {
            user_id: Some(user_id),
            outcome: OperationOutcome::Applied,
        })
    }

    /// Delete an account and its storage.
    ///
    /// The signed-in account cannot be removed. Deletion errors are returned
    /// after the refresh, so a partially deleted tree is still reflected.
    pub async fn remove_account(&self, user_id: &str) -> CoreResult<OperationOutcome> {
        let Some(key) = AccountKey::from_user_id(user_id) else {
            return Ok(OperationOutcome::rejected(Rejection::InvalidUserId));
        };

        // Logins publish under the same lock, so the active check cannot go stale
        let guard = self.io_lock.lock().await;
        if *self.active_user.borrow() == user_id {
            log::warn!("Refusing to remove signed-in account {user_id}");
            return Ok(OperationOutcome::rejected(Rejection::ActiveAccount));
        }
        if !self.contains(key) {
            return Ok(OperationOutcome::rejected(Rejection::UnknownAccount));
        }

        log::info!("Removing account {user_id}");
        let removed = self.ctx.account_store().remove_account_dir(user_id).await;

        self.publish_scan(&guard).await?;
        if let Err(e) = removed {
            log::error!("Failed to remove account {user_id}: {e}");
            return Err(e);
        }

        Ok(OperationOutcome::Applied)
    }

    /// Overwrite an account's username.
    ///
    /// A failed write is logged and reported as `Degraded`; the refresh runs
    /// either way, so the old name stays visible.
    pub async fn rename_account(
        &self,
        user_id: &str,
        username: &str,
    ) -> CoreResult<OperationOutcome> {
        let Some(key) = AccountKey::from_user_id(user_id) else {
            return Ok(OperationOutcome::rejected(Rejection::InvalidUserId));
        };
        if !validate_username(username) {
            return Ok(OperationOutcome::rejected(Rejection::InvalidUsername));
        }

        let guard = self.io_lock.lock().await;
        if !self.contains(key) {
            return Ok(OperationOutcome::rejected(Rejection::UnknownAccount));
        }

        let mut warnings = Vec::new();
        if let Err(e) = self
            .ctx
            .account_store()
            .write_username(user_id, username)
            .await
        {
            log::warn!("Failed to rename account {user_id}: {e}");
            warnings.push(e.to_string());
        }

        self.publish_scan(&guard).await?;
        Ok(OperationOutcome::from_warnings(warnings))
    }

    /// Sign in as `user_id`.
    ///
    /// The emulator call and the settings write are best effort; the active
    /// user is published and the game library is refreshed regardless.
    ///
    /// The existence check and the publish hold the I/O lock, so a concurrent
    /// `remove_account` either sees the new active user or removes the account
    /// before this check.
    pub async fn login_account(&self, user_id: &str) -> CoreResult<OperationOutcome> {
        let Some(key) = AccountKey::from_user_id(user_id) else {
            return Ok(OperationOutcome::rejected(Rejection::InvalidUserId));
        };

        let mut warnings = Vec::new();
        {
            let _guard = self.io_lock.lock().await;
            if !self.contains(key) {
                log::warn!("Refusing to sign in as unknown account {user_id}");
                return Ok(OperationOutcome::rejected(Rejection::UnknownAccount));
            }

            if let Err(e) = self.ctx.emulator().login_user(user_id).await {
                log::warn!("Emulator failed to sign in {user_id}: {e}");
                warnings.push(e.to_string());
            }

            self.active_user.send_replace(user_id.to_string());
        }

        if let Err(e) = self
            .ctx
            .settings_store()
            .set(ACTIVE_USER_KEY, user_id)
            .await
        {
            log::warn!("Failed to persist active user {user_id}: {e}");
            warnings.push(e.to_string());
        }

        self.ctx.library().queue_refresh().await;
        log::info!("Signed in as {user_id}");

        Ok(OperationOutcome::from_warnings(warnings))
    }

    /// Switch to another account, stopping the emulator first if allowed.
    ///
    /// While the emulator is not stopped the switch is refused unless
    /// `stop_emulator` is set.
    pub async fn switch_account(
        &self,
        user_id: &str,
        stop_emulator: bool,
    ) -> CoreResult<OperationOutcome> {
        let Some(key) = AccountKey::from_user_id(user_id) else {
            return Ok(OperationOutcome::rejected(Rejection::InvalidUserId));
        };
        if *self.active_user.borrow() == user_id {
            return Ok(OperationOutcome::rejected(Rejection::AlreadyActive));
        }
        if !self.contains(key) {
            return Ok(OperationOutcome::rejected(Rejection::UnknownAccount));
        }

        let mut warnings = Vec::new();
        let state = self.ctx.emulator().state().await;
        if !state.is_stopped() {
            if !stop_emulator {
                return Ok(OperationOutcome::rejected(Rejection::EmulatorRunning));
            }
            log::info!("Stopping emulator ({state:?}) to switch to {user_id}");
            if let Err(e) = self.ctx.emulator().kill().await {
                log::warn!("Failed to stop emulator: {e}");
                warnings.push(e.to_string());
            }
        }

        match self.login_account(user_id).await? {
            OperationOutcome::Applied => Ok(OperationOutcome::from_warnings(warnings)),
            OperationOutcome::Degraded { warnings: more } => {
                warnings.extend(more);
                Ok(OperationOutcome::from_warnings(warnings))
            }
            rejected @ OperationOutcome::Rejected { .. } => Ok(rejected),
        }
    }
}

/// Pick the signed-in user id from the candidates, in order.
fn resolve_active_user(
    accounts: &AccountsMap,
    from_emulator: Option<&str>,
    from_settings: Option<&str>,
) -> String {
    [from_emulator, from_settings]
        .into_iter()
        .flatten()
        .find(|id| AccountKey::from_user_id(id).is_some_and(|key| accounts.contains_key(&key)))
        .map(str::to_string)
        .or_else(|| accounts.keys().next().map(|key| key.to_user_id()))
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}

/// Smallest key not in `taken` (ascending), `None` when the id space is full.
fn next_free_key(taken: impl IntoIterator<Item = AccountKey>, max: u32) -> Option<AccountKey> {
    first_gap(taken.into_iter().map(AccountKey::value), max).and_then(AccountKey::new)
}

fn first_gap(ascending: impl IntoIterator<Item = u32>, max: u32) -> Option<u32> {
    let mut candidate = AccountKey::MIN;
    for key in ascending {
        if key == candidate {
            candidate += 1;
        } else if key > candidate {
            break;
        }
    }
    (candidate <= max).then_some(candidate)
}
