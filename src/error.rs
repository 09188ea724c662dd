//! Per-message error taxonomy.

use thiserror::Error;

use crate::database::StoreError;
use crate::platform::AdapterError;

/// Why handling one message stopped early.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Persistence failed; nothing past the last committed write happened.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Sending a reply or looking up a user failed.
    #[error("platform adapter failure: {0}")]
    AdapterFailure(#[from] AdapterError),

    /// A command was recognized but can't be acted on.
    #[error("malformed command: {0}")]
    MalformedCommand(&'static str),
}
