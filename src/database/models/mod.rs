//! Database models.

pub mod afk;

pub use afk::{AfkRecord, SpecialUser};
