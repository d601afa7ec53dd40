use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::item_type::ItemType;

/// One viewing-history record. The server upserts on (itemId, itemType),
/// refreshing watched_at and progress on repeat views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub item_id: u64,
    pub item_type: ItemType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Percent watched, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(item_id: u64, item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            item_id,
            item_type,
            title: title.into(),
            poster_path: None,
            progress: None,
            watched_at: None,
        }
    }
}
