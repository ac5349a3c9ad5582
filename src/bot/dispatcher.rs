//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::cache::CacheRegistry;
use crate::database::{AuthRepository, BioFilterRepository, Database, UserRepo};
use crate::events;
use crate::permissions::Permissions;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Admin checker with caching.
    pub permissions: Permissions,

    /// User repository for tracking and resolving users.
    pub users: Arc<UserRepo>,

    /// Per-chat authorization lists.
    pub auth: Arc<AuthRepository>,

    /// Global bio filter flag.
    pub bio_filter: Arc<BioFilterRepository>,

    /// Channel receiving bio violation reports.
    pub log_channel_id: Option<i64>,

    /// Bot username (without @) for deep link construction.
    pub bot_username: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        bot: ThrottledBot,
        db: Arc<Database>,
        cache: Arc<CacheRegistry>,
        owner_ids: Vec<u64>,
        log_channel_id: Option<i64>,
        bot_username: String,
    ) -> Self {
        // Permissions needs the inner Bot for API calls
        let permissions = Permissions::with_owners(bot.inner().clone(), cache.clone(), owner_ids);

        let users = Arc::new(UserRepo::new(&db, &cache));
        let auth = Arc::new(AuthRepository::new(&db, &cache));
        let bio_filter = Arc::new(BioFilterRepository::new(&db, &cache));

        Self {
            permissions,
            users,
            auth,
            bio_filter,
            log_channel_id,
            bot_username,
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    db: Arc<Database>,
    cache: Arc<CacheRegistry>,
    owner_ids: Vec<u64>,
    log_channel_id: Option<i64>,
    bot_username: String,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    let state = AppState::new(bot.clone(), db, cache, owner_ids, log_channel_id, bot_username);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Message handlers: user tracking first, then commands, then the filter
    let message_handler = Update::filter_message()
        .inspect_async(track_user)
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
}

/// Track user from message (runs before all handlers).
///
/// Feeds the user store that answers @username and ID lookups.
async fn track_user(msg: Message, state: AppState) {
    if let Some(user) = msg.from.as_ref() {
        state.users.clone().upsert_background(user.clone());
    }
}
