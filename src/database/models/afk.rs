//! AFK (Away From Keyboard) models.

use serde::{Deserialize, Serialize};

/// AFK status for a user. No record means the user is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfkRecord {
    /// Telegram user ID (stored as i64 for BSON).
    pub user_id: i64,
    /// Unix timestamp (seconds) when the user went AFK.
    pub since: i64,
    /// Reason given, or a fallback picked for them.
    pub reason: String,
    /// First name at the time the user went AFK.
    #[serde(default)]
    pub display_name: String,
}

impl AfkRecord {
    /// Create a new AFK record.
    pub fn new(user_id: u64, reason: impl Into<String>, display_name: impl Into<String>, since: i64) -> Self {
        Self {
            user_id: user_id as i64,
            since,
            reason: reason.into(),
            display_name: display_name.into(),
        }
    }

    /// User ID as the platform sees it.
    pub fn user(&self) -> u64 {
        self.user_id as u64
    }

    /// Seconds spent AFK as of `now`.
    pub fn elapsed_secs(&self, now: i64) -> u64 {
        crate::presence::duration::elapsed_secs(self.since, now)
    }
}

/// Membership document for special AFK mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialUser {
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed() {
        let record = AfkRecord::new(7, "lunch", "Ann", 1_000);
        assert_eq!(record.user(), 7);
        assert_eq!(record.elapsed_secs(1_065), 65);
        assert_eq!(record.elapsed_secs(900), 0);
    }
}
