//! /safk command - toggle special AFK mode.
//!
//! Admin only, sent as a reply to the target user's message. A special-mode
//! user can send `!`-prefixed messages without ending their AFK.

use tracing::info;

use crate::bot::dispatcher::AppState;
use crate::error::HandlerError;
use crate::platform::{InboundMessage, PlatformAdapter};
use crate::strings;

pub async fn safk_command(
    state: &AppState,
    adapter: &dyn PlatformAdapter,
    msg: &InboundMessage,
) -> Result<(), HandlerError> {
    if !state.permissions.is_admin(msg.sender_id) {
        return Err(HandlerError::MalformedCommand("/safk from non-admin"));
    }
    if !msg.is_reply {
        return Err(HandlerError::MalformedCommand("/safk without a reply"));
    }
    let Some(target) = &msg.reply_target else {
        return Err(HandlerError::MalformedCommand("/safk reply target has no sender"));
    };

    let enabled = state.presence.store().toggle_special(target.sender_id).await?;

    info!(
        "Admin {} set special AFK for {} to {}",
        msg.sender_id, target.sender_id, enabled
    );

    adapter
        .send_reply(msg, &strings::special_toggled(&target.sender_display_name, enabled))
        .await?;
    Ok(())
}
