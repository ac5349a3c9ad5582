//! Admin checker with caching.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, UserId};
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};

/// Cache key for admin lookups.
type AdminCacheKey = (i64, u64); // (chat_id, user_id)

/// Admin checker backed by `getChatMember` with a short-TTL cache.
///
/// The cache TTL bounds how long a demoted admin can still pass the check;
/// a failed lookup never grants admin rights.
///
/// Bot owners (from OWNER_IDS env) pass every check in every chat.
#[derive(Clone)]
pub struct Permissions {
    bot: Bot,
    cache: TypedCache<AdminCacheKey, bool>,
    /// Bot owner IDs - these users count as admins everywhere.
    owner_ids: Vec<u64>,
}

impl Permissions {
    /// Create a new admin checker with bot owner IDs.
    pub fn with_owners(bot: Bot, cache_registry: Arc<CacheRegistry>, owner_ids: Vec<u64>) -> Self {
        let cache = cache_registry.get_or_create(
            "admin_status",
            CacheConfig::with_capacity(10_000)
                .ttl(Duration::from_secs(300)) // 5 minutes
                .tti(Duration::from_secs(120)), // 2 minutes idle
        );

        Self {
            bot,
            cache,
            owner_ids,
        }
    }

    /// Check if a user is a bot owner.
    #[inline]
    pub fn is_bot_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id.0)
    }

    /// Check if a user is a group admin or the group owner.
    ///
    /// Bot owners always return true.
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            debug!("User {} is bot owner, treating as admin", user_id);
            return Ok(true);
        }

        let cache_key = (chat_id.0, user_id.0);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Admin cache hit for user {} in chat {}", user_id, chat_id);
            return Ok(cached);
        }

        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        let is_admin = matches!(
            member.kind,
            ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
        );

        // Cache the result (including false for non-admins)
        self.cache.insert(cache_key, is_admin);

        Ok(is_admin)
    }
}
