//! 业务逻辑服务层

mod account_repository;

pub use account_repository::AccountRepository;

use std::sync::Arc;

use crate::traits::{AccountStore, EmulatorBinding, LibraryRefresher, SettingsStore};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Account directory store
    account_store: Arc<dyn AccountStore>,
    /// General settings
    settings_store: Arc<dyn SettingsStore>,
    /// Native emulator binding
    emulator: Arc<dyn EmulatorBinding>,
    /// Game library refresh signal
    library: Arc<dyn LibraryRefresher>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        account_store: Arc<dyn AccountStore>,
        settings_store: Arc<dyn SettingsStore>,
        emulator: Arc<dyn EmulatorBinding>,
        library: Arc<dyn LibraryRefresher>,
    ) -> Self {
        Self {
            account_store,
            settings_store,
            emulator,
            library,
        }
    }

    #[must_use]
    pub fn account_store(&self) -> &Arc<dyn AccountStore> {
        &self.account_store
    }

    #[must_use]
    pub fn settings_store(&self) -> &Arc<dyn SettingsStore> {
        &self.settings_store
    }

    #[must_use]
    pub fn emulator(&self) -> &Arc<dyn EmulatorBinding> {
        &self.emulator
    }

    #[must_use]
    pub fn library(&self) -> &Arc<dyn LibraryRefresher> {
        &self.library
    }
}
