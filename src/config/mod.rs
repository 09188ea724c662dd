//! Configuration module.
//!
//! Loads configuration from environment variables (and `.env`).

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Where presence state is persisted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    /// Lost on restart; for local runs.
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<Url>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Admin user IDs (comma-separated). Only they may use /safk.
    pub admin_ids: Vec<u64>,

    // Storage
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    /// Fallback AFK reasons, one per line.
    pub afk_reasons_file: PathBuf,

    /// Log file; `None` logs to stdout only.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns error if required variables are missing or malformed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = non_empty("BOT_TOKEN").context("BOT_TOKEN must be set")?;

        let bot_mode = match non_empty("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            Some("webhook") => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = non_empty("WEBHOOK_URL")
            .map(|u| Url::parse(&u).with_context(|| format!("invalid WEBHOOK_URL: {u}")))
            .transpose()?;

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            bail!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = non_empty("WEBHOOK_PORT")
            .map(|p| p.parse::<u16>().with_context(|| format!("invalid WEBHOOK_PORT: {p}")))
            .transpose()?
            .unwrap_or(8443);

        // Parse admin IDs, skipping junk entries
        let admin_ids = var("ADMINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        let store_backend = match non_empty("STORE_BACKEND").map(|b| b.to_lowercase()).as_deref() {
            Some("memory") => StoreBackend::Memory,
            None | Some("mongo") | Some("mongodb") => StoreBackend::Mongo,
            Some(other) => bail!("unknown STORE_BACKEND: {other}"),
        };

        let mongodb_uri = non_empty("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            bail!("MONGODB_URI must be set when STORE_BACKEND is mongo");
        }

        // Explicitly empty LOG_FILE turns file logging off
        let log_file = match var("LOG_FILE") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path.trim())),
            None => Some(PathBuf::from("afk_bot.log")),
        };

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: non_empty("WEBHOOK_SECRET"),
            admin_ids,
            store_backend,
            mongodb_uri,
            mongodb_database: non_empty("MONGODB_DATABASE").unwrap_or_else(|| "afk_bot".to_string()),
            afk_reasons_file: non_empty("AFK_REASONS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("funny_afk_reasons.txt")),
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BOT_TOKEN", "123:abc"), ("MONGODB_URI", "mongodb://localhost")]).unwrap();
        assert_eq!(config.bot_mode, BotMode::Polling);
        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert_eq!(config.mongodb_database, "afk_bot");
        assert_eq!(config.webhook_port, 8443);
        assert_eq!(config.afk_reasons_file, PathBuf::from("funny_afk_reasons.txt"));
        assert_eq!(config.log_file, Some(PathBuf::from("afk_bot.log")));
        assert!(config.admin_ids.is_empty());
    }

    #[test]
    fn test_missing_token() {
        assert!(load(&[("MONGODB_URI", "mongodb://localhost")]).is_err());
    }

    #[test]
    fn test_admins_skip_junk() {
        let config = load(&[
            ("BOT_TOKEN", "t"),
            ("STORE_BACKEND", "memory"),
            ("ADMINS", "1, 2,,x, 3 "),
        ])
        .unwrap();
        assert_eq!(config.admin_ids, vec![1, 2, 3]);
        assert!(config.mongodb_uri.is_none());
    }

    #[test]
    fn test_webhook_requires_url() {
        assert!(load(&[("BOT_TOKEN", "t"), ("STORE_BACKEND", "memory"), ("BOT_MODE", "webhook")]).is_err());

        let config = load(&[
            ("BOT_TOKEN", "t"),
            ("STORE_BACKEND", "memory"),
            ("BOT_MODE", "Webhook"),
            ("WEBHOOK_URL", "https://example.org/hook"),
            ("WEBHOOK_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.bot_mode, BotMode::Webhook);
        assert_eq!(config.webhook_port, 9000);
        assert_eq!(config.webhook_url.unwrap().path(), "/hook");
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(load(&[("BOT_TOKEN", "t"), ("STORE_BACKEND", "memory"), ("WEBHOOK_URL", "not a url")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("STORE_BACKEND", "memory"), ("WEBHOOK_PORT", "99999")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("STORE_BACKEND", "redis")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t")]).is_err());
    }

    #[test]
    fn test_log_file_disabled() {
        let config = load(&[("BOT_TOKEN", "t"), ("STORE_BACKEND", "memory"), ("LOG_FILE", "")]).unwrap();
        assert!(config.log_file.is_none());
    }
}
