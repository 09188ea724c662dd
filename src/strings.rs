//! User-facing reply texts.

pub const HELP: &str = "AFK Bot Commands:\n\
    /afk [reason] - Set yourself as AFK with an optional reason.\n\
    brb [reason] - Set yourself as AFK with an optional reason.\n\
    /safk (admin, reply) - Toggle special AFK mode for a user.\n\
    /help - Show this help message.";

pub fn now_afk(name: &str, reason: &str) -> String {
    format!("{name} is AFK\nReason: {reason}\nSince: Just now")
}

pub fn is_afk(name: &str, reason: &str, duration: &str) -> String {
    format!("{name} is AFK\nReason: {reason}\nSince: {duration}")
}

pub fn back_online(name: &str, duration: &str) -> String {
    format!("{name} is now online\nWas AFK for {duration}")
}

pub fn special_toggled(name: &str, enabled: bool) -> String {
    if enabled {
        format!("User {name} now has special AFK mode.")
    } else {
        format!("User {name} no longer has special AFK mode.")
    }
}
