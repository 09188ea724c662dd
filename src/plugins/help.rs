//! /help command.

use crate::error::HandlerError;
use crate::platform::{InboundMessage, PlatformAdapter};
use crate::strings;

/// Reply with the command reference.
pub async fn help_command(adapter: &dyn PlatformAdapter, msg: &InboundMessage) -> Result<(), HandlerError> {
    adapter.send_reply(msg, strings::HELP).await?;
    Ok(())
}
