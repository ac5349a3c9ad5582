//! User data model for caching user information.
//!
//! The Bot API cannot resolve an arbitrary @username, so the bot records
//! every user it sees and answers target lookups from this collection.

use serde::{Deserialize, Serialize};
use teloxide::types::User;

/// Cached user data from Telegram.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedUser {
    /// Telegram user ID.
    pub user_id: u64,
    /// Username without @ (lowercase for matching).
    pub username: Option<String>,
    /// Original username (preserving case for display).
    pub username_display: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl CachedUser {
    /// Create a new CachedUser from a Telegram User.
    pub fn from_telegram(user: &User) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.as_ref().map(|u| u.to_lowercase()),
            username_display: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Check if user data has changed compared to a fresh Telegram User.
    pub fn has_changed(&self, other: &User) -> bool {
        let new_username = other.username.as_ref().map(|u| u.to_lowercase());
        self.username != new_username
            || self.first_name != other.first_name
            || self.last_name != other.last_name
    }
}
