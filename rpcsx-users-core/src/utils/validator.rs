//! Naming rules for user ids and usernames.
//!
//! Validation is strict and never normalizes: it is applied to new user input.
//! Normalization is only used when deriving a display name from on-disk content
//! that may have been edited or corrupted outside the application.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Maximum username length, also the truncation length of `normalize_username`
pub const MAX_USERNAME_LEN: usize = 16;

/// Length of a user id
pub const USER_ID_LEN: usize = 8;

/// User id used when nothing else resolves
pub const DEFAULT_USER_ID: &str = "00000001";

#[allow(clippy::expect_used)]
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,16}$").expect("username pattern is valid"));

/// Exactly 8 characters, all ASCII digits.
#[must_use]
pub fn is_valid_user_id(id: &str) -> bool {
    id.len() == USER_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric value of a valid user id, 0 otherwise.
#[must_use]
pub fn user_key_or_zero(id: &str) -> u32 {
    if is_valid_user_id(id) {
        id.parse().unwrap_or(0)
    } else {
        0
    }
}

#[must_use]
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Keep `[A-Za-z0-9_]` characters, truncate to 16, and fall back when the
/// result is still not a valid username.
#[must_use]
pub fn normalize_username(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_USERNAME_LEN)
        .collect();

    if validate_username(&cleaned) {
        cleaned
    } else {
        fallback.chars().take(MAX_USERNAME_LEN).collect()
    }
}

/// Display name used for accounts whose marker file is empty or unusable.
#[must_use]
pub fn fallback_username(user_id: &str) -> String {
    format!("User{user_id}")
}

/// `Err(InvalidUserId)` unless `is_valid_user_id`
pub fn ensure_user_id(id: &str) -> CoreResult<()> {
    if is_valid_user_id(id) {
        Ok(())
    } else {
        Err(CoreError::InvalidUserId(id.to_string()))
    }
}

/// `Err(InvalidUsername)` unless `validate_username`
pub fn ensure_username(username: &str) -> CoreResult<()> {
    if validate_username(username) {
        Ok(())
    } else {
        Err(CoreError::InvalidUsername(username.to_string()))
    }
}
