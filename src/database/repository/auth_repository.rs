//! Authorization list repository.
//!
//! Per-chat allow-lists read by the bio filter on every message, so reads
//! are cached. Writes go through `$addToSet`/`$pull` and let the store
//! serialize concurrent updates to the same chat document.

use std::time::Duration;

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::Database;
use crate::database::models::AuthList;

/// Repository for per-chat authorization lists.
pub struct AuthRepository {
    collection: Collection<AuthList>,
    cache: TypedCache<i64, AuthList>,
}

impl AuthRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let auth_cache = cache.get_or_create(
            "auth_lists",
            CacheConfig::with_capacity(10_000).ttl(Duration::from_secs(600)), // 10 minutes
        );

        Self {
            collection: db.collection("auth_lists"),
            cache: auth_cache,
        }
    }

    /// Get the authorization list for a chat.
    ///
    /// Chats with no stored document get an empty list, never an error.
    pub async fn get_auth_users(&self, chat_id: i64) -> Result<AuthList> {
        if let Some(list) = self.cache.get(&chat_id) {
            return Ok(list);
        }

        let filter = doc! { "chat_id": chat_id };
        let result = self.collection.find_one(filter).await?;

        let list = result.unwrap_or_else(|| AuthList::new(chat_id));
        self.cache.insert(chat_id, list.clone());

        Ok(list)
    }

    /// Authorize a user in a chat.
    ///
    /// Idempotent: returns false when the user was already on the list.
    pub async fn add_auth(&self, chat_id: i64, user_id: u64) -> Result<bool> {
        let filter = doc! { "chat_id": chat_id };
        let update = doc! { "$addToSet": { "auth_users": user_id as i64 } };
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        // Keep a cached list coherent without a re-fetch
        if let Some(mut list) = self.cache.get(&chat_id) {
            list.authorize(user_id);
            self.cache.insert(chat_id, list);
        }

        let added = result.upserted_id.is_some() || result.modified_count > 0;
        if added {
            debug!("Authorized user {} in chat {}", user_id, chat_id);
        }
        Ok(added)
    }

    /// Unauthorize a user in a chat.
    ///
    /// Idempotent: returns false when the user was not on the list.
    pub async fn remove_auth(&self, chat_id: i64, user_id: u64) -> Result<bool> {
        let filter = doc! { "chat_id": chat_id };
        let update = doc! { "$pull": { "auth_users": user_id as i64 } };

        let result = self.collection.update_one(filter, update).await?;

        if let Some(mut list) = self.cache.get(&chat_id) {
            list.unauthorize(user_id);
            self.cache.insert(chat_id, list);
        }

        let removed = result.modified_count > 0;
        if removed {
            debug!("Unauthorized user {} in chat {}", user_id, chat_id);
        }
        Ok(removed)
    }
}
