//! Database module exports.

mod locks;
mod memory;
mod models;
mod mongo;
mod presence_repository;
mod store;

pub use memory::MemoryPresenceStore;
pub use models::*;
pub use mongo::Database;
pub use presence_repository::PresenceRepository;
pub use store::{AfkSnapshot, PresenceStore, StoreError};
#[cfg(test)]
pub use store::mock::MockStore;
