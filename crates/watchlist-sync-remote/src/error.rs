use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The uniqueness constraint rejected the entry (400 with an
    /// "already ..." message).
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authenticated")]
    Unauthorized,

    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RemoteError {
    /// Classify a non-2xx status and the message the backend sent with it.
    /// Duplicates and validation failures share the 400 status and are
    /// distinguished only by the message text.
    pub fn classify(status: u16, message: String) -> Self {
        match status {
            400 if message.to_lowercase().contains("already") => RemoteError::Duplicate(message),
            400 => RemoteError::Validation(message),
            401 | 403 => RemoteError::Unauthorized,
            404 => RemoteError::NotFound(message),
            status => RemoteError::Api { status, message },
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<crate::response::ApiResponse<serde_json::Value>>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    text
                }
            });

        Self::classify(status.as_u16(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_distinguished_from_validation() {
        let duplicate = RemoteError::classify(400, "Item already in watchlist".to_string());
        assert!(matches!(duplicate, RemoteError::Duplicate(_)));

        let validation =
            RemoteError::classify(400, "Please provide itemId, itemType, and title".to_string());
        assert!(matches!(validation, RemoteError::Validation(_)));
    }

    #[test]
    fn test_auth_and_missing_statuses() {
        assert!(matches!(
            RemoteError::classify(401, "Not authorized".to_string()),
            RemoteError::Unauthorized
        ));
        assert!(matches!(
            RemoteError::classify(403, "Forbidden".to_string()),
            RemoteError::Unauthorized
        ));
        assert!(matches!(
            RemoteError::classify(404, "Item not found in watchlist".to_string()),
            RemoteError::NotFound(_)
        ));
    }

    #[test]
    fn test_other_statuses_are_api_errors() {
        match RemoteError::classify(500, "Error adding to watchlist".to_string()) {
            RemoteError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Error adding to watchlist");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
