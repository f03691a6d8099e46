//! Native emulator binding abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::EmulatorState;

/// Emulator binding
///
/// The emulation engine is external. The repository only asks it which user
/// is signed in, tells it to switch, and stops it before a switch.
/// Every call is treated as best effort by the repository.
#[async_trait]
pub trait EmulatorBinding: Send + Sync {
    /// User id the emulator currently considers signed in
    async fn get_user(&self) -> CoreResult<Option<String>>;

    /// Switch the emulator's signed-in user
    async fn login_user(&self, user_id: &str) -> CoreResult<()>;

    /// Stop the running emulator
    async fn kill(&self) -> CoreResult<()>;

    /// Current run state
    async fn state(&self) -> EmulatorState;
}

/// Collaborator notified when the set of visible titles may have changed
#[async_trait]
pub trait LibraryRefresher: Send + Sync {
    /// Queue a rescan of the game library
    async fn queue_refresh(&self);
}
