//! 账户相关类型定义

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::utils::validator;

/// Numeric value of an 8-digit user id, used as the in-memory map key.
///
/// Always in `1..=99_999_999`; zero is reserved and never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountKey(u32);

impl AccountKey {
    /// Smallest assignable key
    pub const MIN: u32 = 1;
    /// Largest key that still fits in 8 digits
    pub const MAX: u32 = 99_999_999;

    /// Wrap a raw value, `None` if it is outside `MIN..=MAX`.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Parse an 8-digit user id. `"00000000"` is well-formed but yields `None`.
    #[must_use]
    pub fn from_user_id(user_id: &str) -> Option<Self> {
        Self::new(validator::user_key_or_zero(user_id))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Zero-padded 8-digit form
    #[must_use]
    pub fn to_user_id(self) -> String {
        format!("{:08}", self.0)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

impl FromStr for AccountKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_user_id(s).ok_or_else(|| CoreError::InvalidUserId(s.to_string()))
    }
}

/// 账户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Map key, numeric value of `user_id`
    pub key: AccountKey,
    /// 8-digit identifier, also the directory name
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Backing directory (`home/<user_id>`)
    #[serde(rename = "userDir")]
    pub user_dir: PathBuf,
    /// Normalized display name
    pub username: String,
}

impl Account {
    #[must_use]
    pub fn new(key: AccountKey, user_dir: PathBuf, username: String) -> Self {
        Self {
            key,
            user_id: key.to_user_id(),
            user_dir,
            username,
        }
    }
}

/// Snapshot of every recognized account, ordered by key.
pub type AccountsMap = BTreeMap<AccountKey, Account>;
