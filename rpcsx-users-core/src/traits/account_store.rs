//! Account directory storage abstract Trait

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreResult;

/// Name of the marker file holding an account's username
pub const USERNAME_FILE: &str = "localusername";

/// Per-account storage categories created alongside the marker file
pub const ACCOUNT_SUBDIRS: [&str; 3] = ["exdata", "savedata", "trophy"];

/// State of an account directory's `localusername` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerFile {
    /// No marker: the directory is not an account
    Missing,
    /// Present but could not be read as UTF-8 text
    Unreadable,
    /// Trimmed file contents
    Contents(String),
}

/// One subdirectory of the accounts root, as found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    /// Directory name, expected to be an 8-digit user id
    pub dir_name: String,
    /// Full path of the directory
    pub path: PathBuf,
    pub marker: MarkerFile,
}

/// Account Directory Store Trait
///
/// Owns the `home/` tree, one subdirectory per account. Implementations
/// only perform I/O; filtering and normalization happen in the repository.
///
/// Platform implementation:
/// - Desktop/CLI: `FsAccountStore` (`tokio::fs`)
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Accounts root (`<hdd0>/home`)
    fn root(&self) -> &Path;

    /// Directory backing `user_id`
    fn account_dir(&self, user_id: &str) -> PathBuf {
        self.root().join(user_id)
    }

    /// List subdirectories of the root
    ///
    /// Non-directory entries are skipped. A missing root yields an empty list.
    async fn list_entries(&self) -> CoreResult<Vec<AccountEntry>>;

    /// Create the account directory, its storage subdirectories and the marker file
    ///
    /// # Arguments
    /// * `user_id` - 8-digit identifier
    /// * `username` - Name written to the marker file
    async fn create_account_dir(&self, user_id: &str, username: &str) -> CoreResult<()>;

    /// Recursively delete the account directory
    ///
    /// # Arguments
    /// * `user_id` - 8-digit identifier
    async fn remove_account_dir(&self, user_id: &str) -> CoreResult<()>;

    /// Overwrite the marker file
    ///
    /// # Arguments
    /// * `user_id` - 8-digit identifier
    /// * `username` - New name
    async fn write_username(&self, user_id: &str, username: &str) -> CoreResult<()>;
}
