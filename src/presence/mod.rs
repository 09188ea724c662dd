//! Presence core.
//!
//! Decides who is AFK, who just came back, and who a message is talking about.
//! Nothing in here knows about Telegram; platform details arrive through
//! [`crate::platform::PlatformAdapter`] and state lives behind
//! [`crate::database::PresenceStore`].

pub mod duration;
pub mod machine;
pub mod reasons;
pub mod resolver;

pub use duration::format_duration;
pub use machine::PresenceMachine;
pub use reasons::FallbackReasons;
pub use resolver::MentionResolver;
