//! Platform boundary.
//!
//! The presence core sees messages and users only through these types, so
//! the Telegram specifics stay in [`crate::bot`].

use async_trait::async_trait;
use thiserror::Error;

/// Sender of the message an inbound message replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub sender_id: u64,
    pub sender_display_name: String,
}

/// One inbound chat message.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub sender_id: u64,
    pub sender_is_bot: bool,
    pub sender_display_name: String,
    /// Raw message text; empty for media without caption.
    pub text: String,
    /// True for any reply, even when the replied-to sender is unknown.
    pub is_reply: bool,
    pub reply_target: Option<ReplyTarget>,
    /// Users linked by clickable name mentions (no public handle needed).
    pub explicit_mention_user_ids: Vec<u64>,
}

impl InboundMessage {
    /// Sender ID of the replied-to message, if known.
    pub fn reply_target_sender_id(&self) -> Option<u64> {
        self.reply_target.as_ref().map(|t| t.sender_id)
    }
}

/// Failure talking to the messaging platform.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to send reply: {0}")]
    Send(String),

    #[error("failed to look up user: {0}")]
    Lookup(String),
}

/// What the presence core needs from the messaging platform.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Public handle (username, without `@`) of a user, if they have one.
    async fn resolve_display_handle(&self, user_id: u64) -> Result<Option<String>, AdapterError>;

    /// Current display name (first name) of a user, if known.
    async fn resolve_display_name(&self, user_id: u64) -> Result<Option<String>, AdapterError>;

    /// Reply to `original` with plain text.
    async fn send_reply(&self, original: &InboundMessage, text: &str) -> Result<(), AdapterError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    mockall::mock! {
        pub Adapter {}

        #[async_trait]
        impl PlatformAdapter for Adapter {
            async fn resolve_display_handle(&self, user_id: u64) -> Result<Option<String>, AdapterError>;
            async fn resolve_display_name(&self, user_id: u64) -> Result<Option<String>, AdapterError>;
            async fn send_reply(&self, original: &InboundMessage, text: &str) -> Result<(), AdapterError>;
        }
    }
}
