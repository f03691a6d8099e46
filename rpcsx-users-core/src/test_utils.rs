//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{AccountRepository, ServiceContext};
use crate::traits::{
    AccountEntry, AccountStore, EmulatorBinding, LibraryRefresher, MarkerFile, SettingsStore,
    ACCOUNT_SUBDIRS,
};
use crate::types::EmulatorState;

// ===== MockAccountStore =====

#[derive(Debug, Clone)]
pub struct MockDir {
    pub marker: MarkerFile,
    pub subdirs: Vec<String>,
}

/// In-memory `home/` tree keyed by directory name
pub struct MockAccountStore {
    root: PathBuf,
    dirs: RwLock<BTreeMap<String, MockDir>>,
    /// 如果 Some，对应操作返回此错误
    list_error: RwLock<Option<String>>,
    create_error: RwLock<Option<String>>,
    remove_error: RwLock<Option<String>>,
    write_error: RwLock<Option<String>>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/mock/hdd0/home"),
            dirs: RwLock::new(BTreeMap::new()),
            list_error: RwLock::new(None),
            create_error: RwLock::new(None),
            remove_error: RwLock::new(None),
            write_error: RwLock::new(None),
        }
    }

    /// Add an account directory with a marker file
    pub async fn add_account(&self, dir_name: &str, username: &str) {
        self.add_dir(dir_name, MarkerFile::Contents(username.to_string()))
            .await;
    }

    pub async fn add_dir(&self, dir_name: &str, marker: MarkerFile) {
        self.dirs.write().await.insert(
            dir_name.to_string(),
            MockDir {
                marker,
                subdirs: Vec::new(),
            },
        );
    }

    pub async fn dir(&self, dir_name: &str) -> Option<MockDir> {
        self.dirs.read().await.get(dir_name).cloned()
    }

    pub async fn set_list_error(&self, err: Option<String>) {
        *self.list_error.write().await = err;
    }

    pub async fn set_create_error(&self, err: Option<String>) {
        *self.create_error.write().await = err;
    }

    pub async fn set_remove_error(&self, err: Option<String>) {
        *self.remove_error.write().await = err;
    }

    pub async fn set_write_error(&self, err: Option<String>) {
        *self.write_error.write().await = err;
    }
}

#[async_trait]
impl AccountStore for MockAccountStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list_entries(&self) -> CoreResult<Vec<AccountEntry>> {
        if let Some(ref msg) = *self.list_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self
            .dirs
            .read()
            .await
            .iter()
            .map(|(name, dir)| AccountEntry {
                dir_name: name.clone(),
                path: self.account_dir(name),
                marker: dir.marker.clone(),
            })
            .collect())
    }

    async fn create_account_dir(&self, user_id: &str, username: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.create_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.dirs.write().await.insert(
            user_id.to_string(),
            MockDir {
                marker: MarkerFile::Contents(username.to_string()),
                subdirs: ACCOUNT_SUBDIRS.iter().map(|s| (*s).to_string()).collect(),
            },
        );
        Ok(())
    }

    async fn remove_account_dir(&self, user_id: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.remove_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.dirs.write().await.remove(user_id);
        Ok(())
    }

    async fn write_username(&self, user_id: &str, username: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.write_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        let mut dirs = self.dirs.write().await;
        let dir = dirs
            .get_mut(user_id)
            .ok_or_else(|| CoreError::StorageError(format!("no such directory: {user_id}")))?;
        dir.marker = MarkerFile::Contents(username.to_string());
        Ok(())
    }
}

// ===== MockSettingsStore =====

pub struct MockSettingsStore {
    values: RwLock<HashMap<String, String>>,
    fail_reads: RwLock<bool>,
    fail_writes: RwLock<bool>,
}

impl MockSettingsStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            fail_reads: RwLock::new(false),
            fail_writes: RwLock::new(false),
        }
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    pub async fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().await = fail;
    }

    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        if *self.fail_reads.read().await {
            return Err(CoreError::SettingsError("read failed".to_string()));
        }
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        if *self.fail_writes.read().await {
            return Err(CoreError::SettingsError("read-only settings".to_string()));
        }
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ===== MockEmulator =====

pub struct MockEmulator {
    user: RwLock<Option<String>>,
    state: RwLock<EmulatorState>,
    fail_calls: RwLock<bool>,
    logins: RwLock<Vec<String>>,
    kills: AtomicUsize,
}

impl MockEmulator {
    pub fn new() -> Self {
        Self {
            user: RwLock::new(None),
            state: RwLock::new(EmulatorState::Stopped),
            fail_calls: RwLock::new(false),
            logins: RwLock::new(Vec::new()),
            kills: AtomicUsize::new(0),
        }
    }

    pub async fn set_user(&self, user: Option<&str>) {
        *self.user.write().await = user.map(String::from);
    }

    pub async fn set_state(&self, state: EmulatorState) {
        *self.state.write().await = state;
    }

    /// Make every fallible call return an error
    pub async fn set_fail_calls(&self, fail: bool) {
        *self.fail_calls.write().await = fail;
    }

    pub async fn logins(&self) -> Vec<String> {
        self.logins.read().await.clone()
    }

    pub fn kill_count(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmulatorBinding for MockEmulator {
    async fn get_user(&self) -> CoreResult<Option<String>> {
        if *self.fail_calls.read().await {
            return Err(CoreError::EmulatorError("binding unavailable".to_string()));
        }
        Ok(self.user.read().await.clone())
    }

    async fn login_user(&self, user_id: &str) -> CoreResult<()> {
        if *self.fail_calls.read().await {
            return Err(CoreError::EmulatorError("binding unavailable".to_string()));
        }
        self.logins.write().await.push(user_id.to_string());
        *self.user.write().await = Some(user_id.to_string());
        Ok(())
    }

    async fn kill(&self) -> CoreResult<()> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        if *self.fail_calls.read().await {
            return Err(CoreError::EmulatorError("binding unavailable".to_string()));
        }
        *self.state.write().await = EmulatorState::Stopped;
        Ok(())
    }

    async fn state(&self) -> EmulatorState {
        *self.state.read().await
    }
}

// ===== MockLibrary =====

pub struct MockLibrary {
    refreshes: AtomicUsize,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self {
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibraryRefresher for MockLibrary {
    async fn queue_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== Factory =====

pub struct TestRepository {
    pub repo: AccountRepository,
    pub store: Arc<MockAccountStore>,
    pub settings: Arc<MockSettingsStore>,
    pub emulator: Arc<MockEmulator>,
    pub library: Arc<MockLibrary>,
}

/// 创建带 mock 依赖的 `AccountRepository`
pub fn create_test_repository() -> TestRepository {
    let store = Arc::new(MockAccountStore::new());
    let settings = Arc::new(MockSettingsStore::new());
    let emulator = Arc::new(MockEmulator::new());
    let library = Arc::new(MockLibrary::new());

    let ctx = Arc::new(ServiceContext::new(
        store.clone(),
        settings.clone(),
        emulator.clone(),
        library.clone(),
    ));

    TestRepository {
        repo: AccountRepository::new(ctx),
        store,
        settings,
        emulator,
        library,
    }
}
