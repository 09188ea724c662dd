//! Bot module - Telegram wiring.

pub mod dispatcher;
mod runtime;
pub mod telegram;
mod webhook;

pub use dispatcher::build_dispatcher;
pub use runtime::run;
