//! Presence repository.
//!
//! AFK records live in `afk_users`, special mode in `special_afk_users`.
//! AFK reads always hit the collection. Special-mode lookups are cache-first
//! and written through on toggle. Operations on one user are serialized by
//! [`KeyLocks`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use super::locks::KeyLocks;
use super::models::{AfkRecord, SpecialUser};
use super::store::{AfkSnapshot, PresenceStore, StoreError};
use super::Database;

const AFK_COLLECTION: &str = "afk_users";
const SPECIAL_COLLECTION: &str = "special_afk_users";

/// MongoDB-backed [`PresenceStore`].
pub struct PresenceRepository {
    afk: Collection<AfkRecord>,
    special: Collection<SpecialUser>,
    special_cache: TypedCache<u64, bool>,
    locks: KeyLocks,
}

impl PresenceRepository {
    /// Create a new repository.
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let special_cache = cache.get_or_create(
            "special_afk",
            CacheConfig::message_context(),
        );

        Self {
            afk: db.collection(AFK_COLLECTION),
            special: db.collection(SPECIAL_COLLECTION),
            special_cache,
            locks: KeyLocks::new(),
        }
    }

    /// Create the unique `user_id` indexes both collections rely on.
    pub async fn ensure_indexes(db: &Database) -> anyhow::Result<()> {
        db.ensure_unique_index::<AfkRecord>(AFK_COLLECTION, "user_id").await?;
        db.ensure_unique_index::<SpecialUser>(SPECIAL_COLLECTION, "user_id").await?;
        Ok(())
    }
}

fn user_filter(user_id: u64) -> mongodb::bson::Document {
    doc! { "user_id": user_id as i64 }
}

#[async_trait]
impl PresenceStore for PresenceRepository {
    async fn set_afk(
        &self,
        user_id: u64,
        reason: &str,
        display_name: &str,
        now: i64,
    ) -> Result<AfkRecord, StoreError> {
        let _guard = self.locks.lock(user_id).await;
        let record = AfkRecord::new(user_id, reason, display_name, now);

        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.afk
            .replace_one(user_filter(user_id), &record)
            .with_options(options)
            .await?;

        debug!("Stored AFK record for user {}", user_id);
        Ok(record)
    }

    async fn remove_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError> {
        let _guard = self.locks.lock(user_id).await;

        let removed = self.afk.find_one_and_delete(user_filter(user_id)).await?;

        if removed.is_some() {
            debug!("Removed AFK record for user {}", user_id);
        }
        Ok(removed)
    }

    async fn get_afk(&self, user_id: u64) -> Result<Option<AfkRecord>, StoreError> {
        let _guard = self.locks.lock(user_id).await;
        Ok(self.afk.find_one(user_filter(user_id)).await?)
    }

    async fn list_afk(&self) -> Result<AfkSnapshot, StoreError> {
        let records: Vec<AfkRecord> = self.afk.find(doc! {}).await?.try_collect().await?;

        records
            .into_iter()
            .map(|record| {
                if record.user_id < 0 {
                    return Err(StoreError::Corrupt(format!(
                        "negative user_id {} in {}",
                        record.user_id, AFK_COLLECTION
                    )));
                }
                Ok((record.user(), record))
            })
            .collect()
    }

    async fn is_special(&self, user_id: u64) -> Result<bool, StoreError> {
        if let Some(cached) = self.special_cache.get(&user_id) {
            return Ok(cached);
        }

        let _guard = self.locks.lock(user_id).await;
        if let Some(cached) = self.special_cache.get(&user_id) {
            return Ok(cached);
        }

        let special = self.special.find_one(user_filter(user_id)).await?.is_some();
        self.special_cache.insert(user_id, special);
        Ok(special)
    }

    async fn toggle_special(&self, user_id: u64) -> Result<bool, StoreError> {
        let _guard = self.locks.lock(user_id).await;

        let removed = self.special.find_one_and_delete(user_filter(user_id)).await?;
        let enabled = if removed.is_some() {
            false
        } else {
            self.special
                .insert_one(SpecialUser { user_id: user_id as i64 })
                .await?;
            true
        };

        self.special_cache.insert(user_id, enabled);
        debug!("Special AFK for user {} is now {}", user_id, enabled);
        Ok(enabled)
    }
}
