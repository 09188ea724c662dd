//! AFK Sentinel - Telegram AFK bot
//!
//! Tracks who in a group is away and tells anyone who replies to, links,
//! or @mentions them.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `presence` - AFK state machine, mention resolution, duration formatting
//! - `database` - Presence store (MongoDB or in-memory)
//! - `cache` - Named Moka caches
//! - `permissions` - Admin list
//! - `platform` - Transport-agnostic message and adapter types
//! - `plugins` - Per-message router and command handlers
//! - `events` - Organic message handling
//! - `bot` - Telegram dispatcher, adapter and runtime

mod bot;
mod cache;
mod config;
mod database;
mod error;
mod events;
mod permissions;
mod platform;
mod plugins;
mod presence;
mod strings;

use std::path::Path;
use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use bot::dispatcher::AppState;
use bot::telegram::TelegramContext;
use cache::CacheRegistry;
use config::{Config, StoreBackend};
use database::{Database, MemoryPresenceStore, PresenceRepository, PresenceStore};
use permissions::Permissions;
use presence::{FallbackReasons, PresenceMachine};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Console logging plus an optional plain-text log file.
///
/// The returned guard flushes the file writer on drop; keep it alive.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("afk_sentinel=info,teloxide=warn"));

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path.file_name().unwrap_or(path.as_os_str());
            let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Open the configured presence store.
async fn open_store(config: &Config, cache: &CacheRegistry) -> anyhow::Result<Arc<dyn PresenceStore>> {
    match (&config.store_backend, &config.mongodb_uri) {
        (StoreBackend::Mongo, Some(uri)) => {
            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, &config.mongodb_database).await?;
            PresenceRepository::ensure_indexes(&db).await?;
            info!("Database connected");
            Ok(Arc::new(PresenceRepository::new(&db, cache)))
        }
        (StoreBackend::Mongo, None) => anyhow::bail!("MONGODB_URI must be set when STORE_BACKEND is mongo"),
        (StoreBackend::Memory, _) => {
            info!("Using in-memory presence store; AFK state will not survive restarts");
            Ok(Arc::new(MemoryPresenceStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; logging depends on it
    let config = Config::from_env()?;
    let _log_guard = init_logging(&config);

    info!("Starting AFK bot...");
    info!("Bot mode: {:?}", config.bot_mode);

    let reasons = FallbackReasons::load(&config.afk_reasons_file)?;

    let cache = CacheRegistry::new();
    let store = open_store(&config, &cache).await?;

    let permissions = Permissions::with_admins(config.admin_ids.iter().copied());
    if permissions.admin_count() == 0 {
        info!("No admins configured (ADMINS is empty); /safk is disabled");
    } else {
        info!("Bot admins: {:?}", config.admin_ids);
    }

    // Initialize bot with Throttle for automatic rate limiting
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let state = AppState::new(PresenceMachine::new(store, reasons), permissions);
    let telegram = TelegramContext::new(&cache);
    info!("{} caches registered", cache.len());

    let dispatcher = bot::build_dispatcher(bot.clone(), state, telegram);
    bot::run(&config, dispatcher, bot).await
}
