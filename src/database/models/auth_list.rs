//! Per-chat authorization list.
//!
//! Users on a chat's list are exempt from the bio filter.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthList {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram chat ID (indexed)
    pub chat_id: i64,

    /// Authorized user IDs (bypass the bio filter)
    #[serde(default)]
    pub auth_users: Vec<u64>,
}

impl AuthList {
    /// Create an empty list for a chat.
    pub fn new(chat_id: i64) -> Self {
        Self {
            id: None,
            chat_id,
            auth_users: Vec::new(),
        }
    }

    /// Check if a user is authorized.
    pub fn is_authorized(&self, user_id: u64) -> bool {
        self.auth_users.contains(&user_id)
    }

    /// Authorize a user. Returns false if already present.
    pub fn authorize(&mut self, user_id: u64) -> bool {
        if self.auth_users.contains(&user_id) {
            false
        } else {
            self.auth_users.push(user_id);
            true
        }
    }

    /// Unauthorize a user. Returns false if absent.
    pub fn unauthorize(&mut self, user_id: u64) -> bool {
        if let Some(pos) = self.auth_users.iter().position(|&id| id == user_id) {
            self.auth_users.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_then_contains() {
        let mut list = AuthList::new(100);
        assert!(!list.is_authorized(42));

        assert!(list.authorize(42));
        assert!(list.is_authorized(42));
    }

    #[test]
    fn test_authorize_idempotent() {
        let mut list = AuthList::new(100);
        assert!(list.authorize(42));
        assert!(!list.authorize(42));
        assert_eq!(list.auth_users.len(), 1);
    }

    #[test]
    fn test_unauthorize() {
        let mut list = AuthList::new(100);
        list.authorize(42);

        assert!(list.unauthorize(42));
        assert!(!list.is_authorized(42));
        // Removing an absent user is a no-op
        assert!(!list.unauthorize(42));
    }
}
