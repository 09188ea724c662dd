//! Cache module - Named caches using Moka.
//!
//! - `CacheRegistry` - Central registry holding all named caches
//! - `TypedCache` - Typed, cheaply cloneable handle to one cache
//! - `CacheConfig` - Capacity and expiry settings
//!
//! ```rust,ignore
//! let records = registry.get_or_create::<u64, bool>("special_afk", CacheConfig::default());
//! records.insert(user_id, true);
//! let special = records.get(&user_id);
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
