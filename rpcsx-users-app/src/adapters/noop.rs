//! No-op collaborators for frontends without a running emulator.

use async_trait::async_trait;

use rpcsx_users_core::error::CoreResult;
use rpcsx_users_core::traits::{EmulatorBinding, LibraryRefresher};
use rpcsx_users_core::types::EmulatorState;

/// Emulator binding that reports no user and is always stopped
pub struct NoopEmulatorBinding;

#[async_trait]
impl EmulatorBinding for NoopEmulatorBinding {
    async fn get_user(&self) -> CoreResult<Option<String>> {
        Ok(None)
    }

    async fn login_user(&self, user_id: &str) -> CoreResult<()> {
        log::debug!("No emulator attached, skipping login of {user_id}");
        Ok(())
    }

    async fn kill(&self) -> CoreResult<()> {
        Ok(())
    }

    async fn state(&self) -> EmulatorState {
        EmulatorState::Stopped
    }
}

/// Library refresher with no library to refresh
pub struct NoopLibraryRefresher;

#[async_trait]
impl LibraryRefresher for NoopLibraryRefresher {
    async fn queue_refresh(&self) {}
}
