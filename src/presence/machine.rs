//! Presence state machine.
//!
//! A user is AFK exactly when the store holds a record for them. Going AFK
//! always overwrites; coming back deletes. Nothing expires on its own.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::{AfkRecord, AfkSnapshot, PresenceStore, StoreError};
use super::FallbackReasons;

/// Prefix that lets a special-mode user talk without ending their AFK.
pub const QUIET_PREFIX: char = '!';

/// A completed AFK -> present transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    /// The record that was deleted.
    pub record: AfkRecord,
    /// Seconds the user was away.
    pub elapsed_secs: u64,
}

/// Drives PRESENT/AFK transitions through a [`PresenceStore`].
#[derive(Clone)]
pub struct PresenceMachine {
    store: Arc<dyn PresenceStore>,
    reasons: FallbackReasons,
}

impl PresenceMachine {
    pub fn new(store: Arc<dyn PresenceStore>, reasons: FallbackReasons) -> Self {
        Self { store, reasons }
    }

    /// Underlying store.
    pub fn store(&self) -> &dyn PresenceStore {
        self.store.as_ref()
    }

    /// PRESENT/AFK -> AFK.
    ///
    /// A missing or blank reason is replaced with a random fallback.
    pub async fn go_afk(
        &self,
        user_id: u64,
        display_name: &str,
        reason: Option<&str>,
        now: i64,
    ) -> Result<AfkRecord, StoreError> {
        let reason = match reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => reason,
            None => self.reasons.pick(),
        };

        let record = self.store.set_afk(user_id, reason, display_name, now).await?;
        debug!(user_id, reason = %record.reason, "Stored AFK record");
        Ok(record)
    }

    /// AFK -> PRESENT, triggered by an organic message from `user_id`.
    ///
    /// Returns `None` when the user is not AFK in `snapshot`, when a
    /// special-mode user sends a `!`-prefixed message, or when a concurrent
    /// message already completed the return.
    pub async fn observe_message(
        &self,
        user_id: u64,
        text: &str,
        snapshot: &AfkSnapshot,
        now: i64,
    ) -> Result<Option<Return>, StoreError> {
        if !snapshot.contains_key(&user_id) {
            return Ok(None);
        }

        if text.starts_with(QUIET_PREFIX) && self.store.is_special(user_id).await? {
            debug!(user_id, "Special AFK user sent a quiet message, staying AFK");
            return Ok(None);
        }

        let Some(record) = self.store.remove_afk(user_id).await? else {
            debug!(user_id, "AFK record already gone, skipping return");
            return Ok(None);
        };

        let elapsed_secs = record.elapsed_secs(now);
        info!(user_id, elapsed_secs, "User is back");
        Ok(Some(Return {
            record,
            elapsed_secs,
        }))
    }
}
