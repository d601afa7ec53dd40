use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;
use watchlist_sync_models::{Session, User};

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Persisted session slot. The token and user identity live in process
/// memory for the lifetime of the client and are mirrored here so a restart
/// can restore the authenticated state.
pub struct SessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let session_data: SessionData = toml::from_str(&content)?;
            self.values = session_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session_data = SessionData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&session_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn get_token(&self) -> Option<&String> {
        self.get("token")
    }

    pub fn get_saved_at(&self) -> Option<DateTime<Utc>> {
        self.get("saved_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Reconstruct the persisted session, if a complete one is stored.
    pub fn session(&self) -> Option<Session> {
        let token = self.get("token")?.clone();
        let user = User {
            id: self.get("user_id")?.clone(),
            email: self.get("user_email")?.clone(),
            name: self.get("user_name")?.clone(),
            avatar: self.get("user_avatar").cloned(),
        };
        Some(Session { token, user })
    }

    pub fn set_session(&mut self, session: &Session) {
        self.set("token".to_string(), session.token.clone());
        self.set("user_id".to_string(), session.user.id.clone());
        self.set("user_email".to_string(), session.user.email.clone());
        self.set("user_name".to_string(), session.user.name.clone());
        if let Some(avatar) = &session.user.avatar {
            self.set("user_avatar".to_string(), avatar.clone());
        } else {
            self.values.remove("user_avatar");
        }
        self.set("saved_at".to_string(), Utc::now().to_rfc3339());
    }

    /// Drop the stored session and remove the file.
    pub fn clear(&mut self) -> Result<()> {
        self.values.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
