use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::item_type::ItemType;

/// One saved catalog item. The same shape is used on the wire (camelCase)
/// and in the persisted local snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub item_id: u64,
    pub item_type: ItemType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Assigned by the server; None until the entry has round-tripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    pub fn new(item_id: u64, item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            item_id,
            item_type,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            release_date: None,
            vote_average: None,
            added_at: None,
        }
    }

    /// Uniqueness key within one account's list.
    pub fn key(&self) -> (u64, ItemType) {
        (self.item_id, self.item_type)
    }
}
