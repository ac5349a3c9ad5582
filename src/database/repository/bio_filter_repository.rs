//! Bio filter status repository.
//!
//! One singleton document carries the deployment-wide enabled flag. The
//! flag is read on every filtered message, so it sits behind a short-TTL
//! cache; the toggle writes through with `$set` + upsert.

use std::time::Duration;

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use tracing::info;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::Database;
use crate::database::models::FilterStatus;
use crate::database::models::filter_status::FILTER_KEY;

/// Repository for the global bio filter flag.
pub struct BioFilterRepository {
    collection: Collection<FilterStatus>,
    cache: TypedCache<&'static str, bool>,
}

impl BioFilterRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        let status_cache = cache.get_or_create(
            "bio_filter_status",
            CacheConfig::with_capacity(8).ttl(Duration::from_secs(60)),
        );

        Self {
            collection: db.collection("bio_filter"),
            cache: status_cache,
        }
    }

    /// Whether the bio filter is currently enabled.
    ///
    /// An absent document counts as disabled.
    pub async fn get_status(&self) -> Result<bool> {
        if let Some(status) = self.cache.get(&FILTER_KEY) {
            return Ok(status);
        }

        let filter = doc! { "filter": FILTER_KEY };
        let result = self.collection.find_one(filter).await?;

        let status = result.map(|d| d.status).unwrap_or(false);
        self.cache.insert(FILTER_KEY, status);

        Ok(status)
    }

    /// Enable or disable the bio filter.
    pub async fn set_status(&self, enabled: bool) -> Result<()> {
        let filter = doc! { "filter": FILTER_KEY };
        let update = doc! { "$set": { "status": enabled } };
        let options = UpdateOptions::builder().upsert(true).build();

        self.collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        self.cache.insert(FILTER_KEY, enabled);
        info!("Bio filter {}", if enabled { "enabled" } else { "disabled" });

        Ok(())
    }
}
