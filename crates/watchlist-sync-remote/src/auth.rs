use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use watchlist_sync_models::{Session, User};
use crate::error::RemoteError;
use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    token: String,
    user: User,
}

/// Exchange credentials for a bearer token and user identity.
pub async fn login(
    client: &Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<Session, RemoteError> {
    debug!(email = %email, "Logging in");
    let response = client
        .post(format!("{}/auth/login", base_url))
        .json(&LoginRequest { email, password })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<SessionPayload> = response.json().await?;
    session_from_payload(body)
}

/// Create an account. The backend issues a session straight away.
pub async fn register(
    client: &Client,
    base_url: &str,
    email: &str,
    password: &str,
    name: &str,
) -> Result<Session, RemoteError> {
    debug!(email = %email, "Registering account");
    let response = client
        .post(format!("{}/auth/register", base_url))
        .json(&RegisterRequest { email, password, name })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<SessionPayload> = response.json().await?;
    session_from_payload(body)
}

/// Validate a stored token by fetching the user it belongs to.
pub async fn current_user(
    client: &Client,
    base_url: &str,
    token: &str,
) -> Result<User, RemoteError> {
    let response = client
        .get(format!("{}/auth/me", base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RemoteError::from_response(response).await);
    }

    let body: ApiResponse<User> = response.json().await?;
    body.data.ok_or_else(|| RemoteError::Api {
        status: 200,
        message: body.message.unwrap_or_else(|| "user payload missing from response".to_string()),
    })
}

fn session_from_payload(body: ApiResponse<SessionPayload>) -> Result<Session, RemoteError> {
    match body.data {
        Some(payload) => Ok(Session {
            token: payload.token,
            user: payload.user,
        }),
        None => Err(RemoteError::Api {
            status: 200,
            message: body.message.unwrap_or_else(|| "session payload missing from response".to_string()),
        }),
    }
}
