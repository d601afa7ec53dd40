use async_trait::async_trait;
use watchlist_sync_models::{ItemType, WatchlistEntry};
use crate::client::BackendClient;
use crate::error::RemoteError;

/// The authoritative per-account watchlist store the sync coordinator
/// consumes. All calls require a bearer token; the store alone enforces the
/// (itemId, itemType) uniqueness invariant.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, token: &str) -> Result<Vec<WatchlistEntry>, RemoteError>;
    async fn create(&self, token: &str, entry: &WatchlistEntry) -> Result<WatchlistEntry, RemoteError>;
    async fn delete(&self, token: &str, item_id: u64, item_type: ItemType) -> Result<(), RemoteError>;
}

#[async_trait]
impl RemoteStore for BackendClient {
    async fn list(&self, token: &str) -> Result<Vec<WatchlistEntry>, RemoteError> {
        self.watchlist(token).await
    }

    async fn create(&self, token: &str, entry: &WatchlistEntry) -> Result<WatchlistEntry, RemoteError> {
        self.add_to_watchlist(token, entry).await
    }

    async fn delete(&self, token: &str, item_id: u64, item_type: ItemType) -> Result<(), RemoteError> {
        self.remove_from_watchlist(token, item_id, item_type).await
    }
}
