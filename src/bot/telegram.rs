//! Telegram implementation of the platform adapter.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageEntityKind, MessageId, ReplyParameters, User, UserId};
use teloxide::RequestError;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::platform::{AdapterError, InboundMessage, PlatformAdapter, ReplyTarget};
use super::dispatcher::ThrottledBot;

/// What we know about a Telegram user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    /// Username without @.
    pub username: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Long-lived Telegram state shared by all message handlers.
#[derive(Clone)]
pub struct TelegramContext {
    /// Profiles keyed by user ID. Only users actually seen or found are
    /// stored; a miss in one chat says nothing about another.
    profiles: TypedCache<u64, UserProfile>,
}

impl TelegramContext {
    pub fn new(cache: &CacheRegistry) -> Self {
        let profiles = cache.get_or_create(
            "user_profiles",
            CacheConfig::with_capacity(10_000)
                .ttl(Duration::from_secs(1800)) // 30 min (usernames change)
                .tti(Duration::from_secs(600)),
        );
        Self { profiles }
    }

    /// Cache the profiles of everyone visible in `msg`.
    pub fn remember_users(&self, msg: &Message) {
        let reply_sender = msg.reply_to_message().and_then(|r| r.from.as_ref());
        for user in msg.from.as_ref().into_iter().chain(reply_sender) {
            self.profiles.insert(user.id.0, UserProfile::from(user));
        }
    }

    /// Adapter bound to one chat.
    pub fn adapter(&self, bot: ThrottledBot, chat_id: ChatId) -> TelegramAdapter {
        TelegramAdapter {
            bot,
            chat_id,
            profiles: self.profiles.clone(),
        }
    }
}

/// Convert a Telegram message. Returns `None` for messages without a sender.
pub fn inbound_from_message(msg: &Message) -> Option<InboundMessage> {
    let sender = msg.from.as_ref()?;
    let text = msg.text().or_else(|| msg.caption()).unwrap_or_default();

    let reply = msg.reply_to_message();
    let reply_target = reply.and_then(|r| r.from.as_ref()).map(|user| ReplyTarget {
        sender_id: user.id.0,
        sender_display_name: user.first_name.clone(),
    });

    let explicit_mention_user_ids = msg
        .entities()
        .or_else(|| msg.caption_entities())
        .unwrap_or_default()
        .iter()
        .filter_map(|entity| match &entity.kind {
            MessageEntityKind::TextMention { user } => Some(user.id.0),
            _ => None,
        })
        .collect();

    Some(InboundMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        sender_id: sender.id.0,
        sender_is_bot: sender.is_bot,
        sender_display_name: sender.first_name.clone(),
        text: text.to_string(),
        is_reply: reply.is_some(),
        reply_target,
        explicit_mention_user_ids,
    })
}

/// [`PlatformAdapter`] for one Telegram chat.
pub struct TelegramAdapter {
    bot: ThrottledBot,
    chat_id: ChatId,
    profiles: TypedCache<u64, UserProfile>,
}

impl TelegramAdapter {
    /// Profile from cache, else from the chat's member list.
    async fn profile(&self, user_id: u64) -> Result<Option<UserProfile>, AdapterError> {
        if let Some(cached) = self.profiles.get(&user_id) {
            return Ok(Some(cached));
        }

        let profile = match self.bot.get_chat_member(self.chat_id, UserId(user_id)).await {
            Ok(member) => Some(UserProfile::from(&member.user)),
            // Telegram answered but doesn't know the user here
            Err(RequestError::Api(e)) => {
                debug!("No profile for user {} in chat {}: {}", user_id, self.chat_id, e);
                None
            }
            Err(e) => return Err(AdapterError::Lookup(e.to_string())),
        };

        self.remember_lookup(user_id, profile.as_ref());
        Ok(profile)
    }

    /// Cache a lookup result. Misses are chat-scoped, so they are not kept.
    fn remember_lookup(&self, user_id: u64, profile: Option<&UserProfile>) {
        if let Some(profile) = profile {
            self.profiles.insert(user_id, profile.clone());
        }
    }
}

#[async_trait]
impl PlatformAdapter for TelegramAdapter {
    async fn resolve_display_handle(&self, user_id: u64) -> Result<Option<String>, AdapterError> {
        Ok(self.profile(user_id).await?.and_then(|p| p.username))
    }

    async fn resolve_display_name(&self, user_id: u64) -> Result<Option<String>, AdapterError> {
        Ok(self.profile(user_id).await?.map(|p| p.first_name))
    }

    async fn send_reply(&self, original: &InboundMessage, text: &str) -> Result<(), AdapterError> {
        self.bot
            .send_message(ChatId(original.chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(original.message_id)))
            .await
            .map_err(|e| AdapterError::Send(e.to_string()))?;
        Ok(())
    }
}
