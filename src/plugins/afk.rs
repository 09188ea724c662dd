//! AFK command handler.
//!
//! `/afk [reason]` and its alias `brb [reason]`.

use tracing::info;

use crate::bot::dispatcher::AppState;
use crate::error::HandlerError;
use crate::platform::{InboundMessage, PlatformAdapter};
use crate::strings;

/// Mark the sender AFK and announce it.
///
/// Sending it again while already AFK restarts the clock with the new reason.
pub async fn afk_command(
    state: &AppState,
    adapter: &dyn PlatformAdapter,
    msg: &InboundMessage,
    reason: Option<&str>,
    now: i64,
) -> Result<(), HandlerError> {
    let record = state
        .presence
        .go_afk(msg.sender_id, &msg.sender_display_name, reason, now)
        .await?;

    info!("User {} went AFK in chat {}", msg.sender_id, msg.chat_id);

    adapter
        .send_reply(msg, &strings::now_afk(&msg.sender_display_name, &record.reason))
        .await?;
    Ok(())
}
