//! Biosentry - Telegram bio filter bot.
//!
//! Removes group messages from users whose profile bio advertises a link
//! or a username, unless the user is an admin or has been authorized.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration (auth lists, filter flag, seen users)
//! - `cache` - LRU-based caching with Moka
//! - `permissions` - Admin checking with caching
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command handlers
//! - `events` - Per-message bio filter
//! - `utils` - Matchers, target resolution, formatting

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CacheRegistry;
use config::Config;
use database::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("biosentry=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Biosentry bot...");

    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    let db = Arc::new(db);
    info!("Database connected");

    let cache = Arc::new(CacheRegistry::new());
    info!("Cache registry initialized");

    // Throttle keeps us inside Telegram's per-chat and global send limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    // Prefer the configured username, fallback to getMe
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    match config.log_channel_id {
        Some(id) => info!("Violation reports go to channel {}", id),
        None => info!("LOG_CHANNEL_ID not set, violation reports disabled"),
    }

    let dispatcher = bot::build_dispatcher(
        bot.clone(),
        db,
        cache,
        config.owner_ids.clone(),
        config.log_channel_id,
        bot_username,
    );

    bot::run(&config, dispatcher, bot).await;

    Ok(())
}
