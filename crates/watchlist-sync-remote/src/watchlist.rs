use reqwest::Client;
use tracing::debug;
use watchlist_sync_models::{ItemType, WatchlistEntry};
use crate::error::RemoteError;
use crate::response::ApiResponse;

/// Fetch the full remote watchlist, newest first.
pub async fn get_watchlist(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<Vec<WatchlistEntry>, RemoteError> {
    let response = client
        .get(format!("{}/watchlist", base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    // Server records carry storage fields (_id, userId) beyond the entry
    // shape; serde drops them on the way in.
    let body: ApiResponse<Vec<WatchlistEntry>> = response.json().await?;
    let entries = body.data.unwrap_or_default();
    debug!(count = entries.len(), "Fetched remote watchlist");
    Ok(entries)
}

/// Create one watchlist entry. The store is the sole arbiter of the
/// (itemId, itemType) uniqueness invariant and answers 400 on a duplicate.
pub async fn add_to_watchlist(
    client: &Client,
    base_url: &str,
    token: &str,
    entry: &WatchlistEntry,
) -> Result<WatchlistEntry, RemoteError> {
    let response = client
        .post(format!("{}/watchlist", base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(entry)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<WatchlistEntry> = response.json().await?;
    body.data.ok_or_else(|| RemoteError::Api {
        status: 200,
        message: body.message.unwrap_or_else(|| "created entry missing from response".to_string()),
    })
}

/// Delete one watchlist entry by its uniqueness key. 404 when absent.
pub async fn remove_from_watchlist(
    client: &Client,
    base_url: &str,
    token: &str,
    item_id: u64,
    item_type: ItemType,
) -> Result<(), RemoteError> {
    let response = client
        .delete(format!("{}/watchlist/{}/{}", base_url, item_id, item_type))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    Ok(())
}
