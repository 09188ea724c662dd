//! Organic message handling.
//!
//! First checks whether the sender is coming back from AFK; if not, tells
//! the chat about every AFK user the message refers to.

use crate::bot::dispatcher::AppState;
use crate::error::HandlerError;
use crate::platform::{InboundMessage, PlatformAdapter};
use crate::presence::{format_duration, MentionResolver};
use crate::strings;

/// Run the return check, then the mention check, for one message.
///
/// `text` is the trimmed message text.
pub async fn on_message(
    state: &AppState,
    adapter: &dyn PlatformAdapter,
    msg: &InboundMessage,
    text: &str,
    now: i64,
) -> Result<(), HandlerError> {
    let snapshot = state.presence.store().list_afk().await?;
    if snapshot.is_empty() {
        return Ok(());
    }

    if let Some(back) = state
        .presence
        .observe_message(msg.sender_id, text, &snapshot, now)
        .await?
    {
        let duration = format_duration(back.elapsed_secs);
        adapter
            .send_reply(msg, &strings::back_online(&msg.sender_display_name, &duration))
            .await?;
        return Ok(());
    }

    let mentioned = MentionResolver::resolve(msg, &snapshot, adapter).await?;
    if let Some(reply) = MentionResolver::render(&mentioned, &snapshot, adapter, now).await? {
        adapter.send_reply(msg, &reply).await?;
    }

    Ok(())
}
