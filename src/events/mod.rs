//! Handlers for organic (non-command) messages.

pub mod presence;
