//! Presence store contract.
//!
//! Implementations must make every operation atomic per user ID.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use super::models::AfkRecord;

/// Snapshot of every AFK user at one point in time.
pub type AfkSnapshot = HashMap<u64, AfkRecord>;

/// Persistence failure. The caller treats any of these as "store unavailable".
#[derive(Debug, Error)]
pub enum StoreError {
    /// MongoDB driver error (I/O, timeout, server error).
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A stored document could not be interpreted.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Persistent user -> AFK record mapping plus the special-mode set.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Write (or overwrite) the user's AFK record, resetting `since` to `now`.
    async fn set_afk(
        &self,
        user_id: u64,
        reason: &str,
        display_name: &str,
        now: i64,
    ) -> Result<AfkRecord, StoreError>;

    /// Delete the user's AFK record. Returns the removed record, if any.
    async fn remove_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError>;

    /// Get the user's AFK record.
    async fn get_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError>;

    /// Snapshot of all AFK users.
    async fn list_afk(&self) -> Result<AfkSnapshot, StoreError>;

    /// Whether the user has special AFK mode.
    async fn is_special(&self, user_id: u64) -> Result<bool, StoreError>;

    /// Flip special AFK mode for a user. Returns the new state.
    async fn toggle_special(&self, user_id: u64) -> Result<bool, StoreError>;
}
