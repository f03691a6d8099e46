//! `AccountStore` implementation over the emulator's `home/` directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use rpcsx_users_core::error::{CoreError, CoreResult};
use rpcsx_users_core::traits::{
    AccountEntry, AccountStore, MarkerFile, ACCOUNT_SUBDIRS, USERNAME_FILE,
};

/// Directory holding the account directories, relative to `dev_hdd0`
const HOME_DIR: &str = "home";

/// Filesystem-backed account store.
///
/// Layout under the root:
/// ```text
/// <root>/<8-digit-id>/localusername
/// <root>/<8-digit-id>/exdata/
/// <root>/<8-digit-id>/savedata/
/// <root>/<8-digit-id>/trophy/
/// ```
pub struct FsAccountStore {
    root: PathBuf,
}

impl FsAccountStore {
    /// Store rooted directly at `root` (the `home` directory).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store for the emulator's `dev_hdd0` directory; accounts live in `<hdd0>/home`.
    #[must_use]
    pub fn from_hdd0(hdd0_dir: &Path) -> Self {
        Self::new(hdd0_dir.join(HOME_DIR))
    }

    /// Inspect `<dir>/localusername`.
    async fn read_marker(dir: &Path) -> MarkerFile {
        let path = dir.join(USERNAME_FILE);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => match fs::read_to_string(&path).await {
                Ok(text) => MarkerFile::Contents(text.trim().to_string()),
                Err(e) => {
                    log::debug!("Cannot read {}: {e}", path.display());
                    MarkerFile::Unreadable
                }
            },
            Ok(_) => MarkerFile::Missing,
            Err(e) if e.kind() == ErrorKind::NotFound => MarkerFile::Missing,
            Err(e) => {
                log::debug!("Cannot stat {}: {e}", path.display());
                MarkerFile::Unreadable
            }
        }
    }
}

fn storage_error(action: &str, path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::StorageError(format!("Failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl AccountStore for FsAccountStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list_entries(&self) -> CoreResult<Vec<AccountEntry>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Accounts root does not exist: {}", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(storage_error("list", &self.root, &e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| storage_error("list", &self.root, &e))?
        {
            let path = entry.path();
            // Follows symlinks, so a linked account directory still counts
            let is_dir = fs::metadata(&path).await.is_ok_and(|m| m.is_dir());
            if !is_dir {
                continue;
            }
            let Ok(dir_name) = entry.file_name().into_string() else {
                log::debug!("Skipping non UTF-8 entry in {}", self.root.display());
                continue;
            };

            let marker = Self::read_marker(&path).await;
            entries.push(AccountEntry {
                dir_name,
                path,
                marker,
            });
        }

        Ok(entries)
    }

    async fn create_account_dir(&self, user_id: &str, username: &str) -> CoreResult<()> {
        let dir = self.account_dir(user_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_error("create", &dir, &e))?;

        for name in ACCOUNT_SUBDIRS {
            let sub = dir.join(name);
            fs::create_dir_all(&sub)
                .await
                .map_err(|e| storage_error("create", &sub, &e))?;
        }

        let marker = dir.join(USERNAME_FILE);
        fs::write(&marker, username)
            .await
            .map_err(|e| storage_error("write", &marker, &e))
    }

    async fn remove_account_dir(&self, user_id: &str) -> CoreResult<()> {
        let dir = self.account_dir(user_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} already gone", dir.display());
                Ok(())
            }
            Err(e) => Err(storage_error("remove", &dir, &e)),
        }
    }

    async fn write_username(&self, user_id: &str, username: &str) -> CoreResult<()> {
        let marker = self.account_dir(user_id).join(USERNAME_FILE);
        fs::write(&marker, username)
            .await
            .map_err(|e| storage_error("write", &marker, &e))
    }
}
