//! Global bio filter status.
//!
//! A single document holds the deployment-wide enabled flag. There is no
//! per-chat override; authorization lists are the per-chat escape hatch.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Marker value stored in the `filter` field of the singleton document.
pub const FILTER_KEY: &str = "enabled";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterStatus {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Fixed marker key identifying the singleton document.
    pub filter: String,

    /// Whether the bio filter is enabled.
    #[serde(default)]
    pub status: bool,
}

impl Default for FilterStatus {
    /// A missing document means the filter is disabled.
    fn default() -> Self {
        Self {
            id: None,
            filter: FILTER_KEY.to_string(),
            status: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_document_is_disabled() {
        let status = FilterStatus::default();
        assert!(!status.status);
        assert_eq!(status.filter, FILTER_KEY);
    }
}
