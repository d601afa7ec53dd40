use reqwest::Client;
use tracing::debug;
use watchlist_sync_models::{HistoryEntry, ItemType};
use crate::error::RemoteError;
use crate::response::ApiResponse;

/// Fetch the viewing history, newest first, capped at `limit` records.
pub async fn get_history(
    client: &Client,
    base_url: &str,
    token: &str,
    limit: Option<u32>,
) -> Result<Vec<HistoryEntry>, RemoteError> {
    let mut request = client
        .get(format!("{}/history", base_url))
        .header("Authorization", format!("Bearer {}", token));
    if let Some(limit) = limit {
        request = request.query(&[("limit", limit)]);
    }
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<Vec<HistoryEntry>> = response.json().await?;
    let entries = body.data.unwrap_or_default();
    debug!(count = entries.len(), "Fetched watch history");
    Ok(entries)
}

/// Record a view. The server upserts on (itemId, itemType), refreshing
/// watched_at and progress when the item was already in the history.
pub async fn add_to_history(
    client: &Client,
    base_url: &str,
    token: &str,
    entry: &HistoryEntry,
) -> Result<HistoryEntry, RemoteError> {
    let response = client
        .post(format!("{}/history", base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(entry)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<HistoryEntry> = response.json().await?;
    body.data.ok_or_else(|| RemoteError::Api {
        status: 200,
        message: body.message.unwrap_or_else(|| "history entry missing from response".to_string()),
    })
}

/// Delete one history record. 404 when absent.
pub async fn remove_from_history(
    client: &Client,
    base_url: &str,
    token: &str,
    item_id: u64,
    item_type: ItemType,
) -> Result<(), RemoteError> {
    let response = client
        .delete(format!("{}/history/{}/{}", base_url, item_id, item_type))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    Ok(())
}

/// Clear the whole history for the account.
pub async fn clear_history(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<(), RemoteError> {
    let response = client
        .delete(format!("{}/history", base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    Ok(())
}
