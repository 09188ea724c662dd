//! Command handlers and the per-message router.
//!
//! Every inbound message takes exactly one route, checked in order:
//! bot sender, `/help`, `/safk`, `/afk` or `brb`, then everything else.

pub mod afk;
pub mod help;
pub mod safk;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::bot::dispatcher::AppState;
use crate::error::HandlerError;
use crate::events;
use crate::platform::{InboundMessage, PlatformAdapter};

/// Where a message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    /// Sent by a bot account.
    Ignore,
    /// `/help`
    Help,
    /// `/safk`
    ToggleSpecial,
    /// `/afk [reason]` or `brb [reason]`
    SetAfk { reason: Option<&'a str> },
    /// Not a command.
    Organic,
}

/// Classify a message by its trimmed `text`.
pub fn classify<'a>(msg: &InboundMessage, text: &'a str) -> Route<'a> {
    if msg.sender_is_bot {
        return Route::Ignore;
    }

    if text.eq_ignore_ascii_case("/help") {
        return Route::Help;
    }

    if text.eq_ignore_ascii_case("/safk") {
        return Route::ToggleSpecial;
    }

    let lower = text.to_lowercase();
    if lower.starts_with("/afk") || lower.starts_with("brb") {
        let reason = text.split_once(' ').map(|(_, rest)| rest);
        return Route::SetAfk { reason };
    }

    Route::Organic
}

/// Handle one inbound message. Never fails; errors are logged and the
/// message is dropped.
pub async fn handle_message(state: &AppState, adapter: &dyn PlatformAdapter, msg: &InboundMessage) {
    handle_message_at(state, adapter, msg, Utc::now().timestamp()).await;
}

/// [`handle_message`] with an explicit clock.
pub async fn handle_message_at(
    state: &AppState,
    adapter: &dyn PlatformAdapter,
    msg: &InboundMessage,
    now: i64,
) {
    let result = route_message(state, adapter, msg, now).await;

    match result {
        Ok(()) => {}
        Err(HandlerError::MalformedCommand(reason)) => {
            debug!(chat_id = msg.chat_id, user_id = msg.sender_id, "Ignoring command: {}", reason);
        }
        Err(e @ HandlerError::AdapterFailure(_)) => {
            warn!(chat_id = msg.chat_id, user_id = msg.sender_id, "Dropping message: {}", e);
        }
        Err(e @ HandlerError::StoreUnavailable(_)) => {
            error!(chat_id = msg.chat_id, user_id = msg.sender_id, "Dropping message: {}", e);
        }
    }
}

async fn route_message(
    state: &AppState,
    adapter: &dyn PlatformAdapter,
    msg: &InboundMessage,
    now: i64,
) -> Result<(), HandlerError> {
    let text = msg.text.trim();
    let route = classify(msg, text);

    debug!(
        chat_id = msg.chat_id,
        user_id = msg.sender_id,
        ?route,
        "Routing message"
    );

    match route {
        Route::Ignore => Ok(()),
        Route::Help => help::help_command(adapter, msg).await,
        Route::ToggleSpecial => safk::safk_command(state, adapter, msg).await,
        Route::SetAfk { reason } => afk::afk_command(state, adapter, msg, reason, now).await,
        Route::Organic => events::presence::on_message(state, adapter, msg, text, now).await,
    }
}
