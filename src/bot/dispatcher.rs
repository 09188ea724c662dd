//! Message dispatcher setup.
//!
//! Builds the teloxide dispatcher and hands every message to
//! [`crate::plugins::handle_message`].

use std::convert::Infallible;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::permissions::Permissions;
use crate::plugins;
use crate::presence::PresenceMachine;
use super::telegram::{self, TelegramContext};

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Dispatcher with no per-chat ordering: every update runs as its own task.
pub type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, Infallible>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// AFK state machine and the store behind it.
    pub presence: PresenceMachine,

    /// Admins allowed to toggle special AFK mode.
    pub permissions: Permissions,
}

impl AppState {
    /// Create a new application state.
    pub fn new(presence: PresenceMachine, permissions: Permissions) -> Self {
        Self {
            presence,
            permissions,
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(bot: ThrottledBot, state: AppState, telegram: TelegramContext) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state, telegram])
        .distribution_function(|_| None::<Infallible>)
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().endpoint(message_endpoint)
}

/// Convert, remember the sender, and route one message.
async fn message_endpoint(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    telegram: TelegramContext,
) -> anyhow::Result<()> {
    let Some(inbound) = telegram::inbound_from_message(&msg) else {
        return Ok(());
    };

    telegram.remember_users(&msg);
    let adapter = telegram.adapter(bot, msg.chat.id);
    plugins::handle_message(&state, &adapter, &inbound).await;

    Ok(())
}
