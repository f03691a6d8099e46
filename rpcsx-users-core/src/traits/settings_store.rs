//! Settings persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Settings key holding the signed-in user id
pub const ACTIVE_USER_KEY: &str = "active_user";

/// General settings store
///
/// A flat string key/value store shared with the rest of the front-end.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value, `None` if unset
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;
}
