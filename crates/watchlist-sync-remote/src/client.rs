use reqwest::Client;
use std::time::Duration;
use watchlist_sync_models::{HistoryEntry, ItemType, Session, User, WatchlistEntry};
use crate::error::RemoteError;
use crate::{auth, history, watchlist};

/// HTTP client for the catalog service's user backend. Thin wrapper over
/// the endpoint functions; holds the base URL and a shared reqwest client.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Account

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        auth::login(&self.http, &self.base_url, email, password).await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Session, RemoteError> {
        auth::register(&self.http, &self.base_url, email, password, name).await
    }

    pub async fn current_user(&self, token: &str) -> Result<User, RemoteError> {
        auth::current_user(&self.http, &self.base_url, token).await
    }

    // Watchlist

    pub async fn watchlist(&self, token: &str) -> Result<Vec<WatchlistEntry>, RemoteError> {
        watchlist::get_watchlist(&self.http, &self.base_url, token).await
    }

    pub async fn add_to_watchlist(&self, token: &str, entry: &WatchlistEntry) -> Result<WatchlistEntry, RemoteError> {
        watchlist::add_to_watchlist(&self.http, &self.base_url, token, entry).await
    }

    pub async fn remove_from_watchlist(&self, token: &str, item_id: u64, item_type: ItemType) -> Result<(), RemoteError> {
        watchlist::remove_from_watchlist(&self.http, &self.base_url, token, item_id, item_type).await
    }

    // Watch history

    pub async fn history(&self, token: &str, limit: Option<u32>) -> Result<Vec<HistoryEntry>, RemoteError> {
        history::get_history(&self.http, &self.base_url, token, limit).await
    }

    pub async fn add_to_history(&self, token: &str, entry: &HistoryEntry) -> Result<HistoryEntry, RemoteError> {
        history::add_to_history(&self.http, &self.base_url, token, entry).await
    }

    pub async fn remove_from_history(&self, token: &str, item_id: u64, item_type: ItemType) -> Result<(), RemoteError> {
        history::remove_from_history(&self.http, &self.base_url, token, item_id, item_type).await
    }

    pub async fn clear_history(&self, token: &str) -> Result<(), RemoteError> {
        history::clear_history(&self.http, &self.base_url, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://localhost:5001/api/", 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001/api");
    }
}
