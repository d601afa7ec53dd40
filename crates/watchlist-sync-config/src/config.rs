use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncOptions,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncOptions {
    /// Pull the remote watchlist whenever a session becomes authenticated.
    #[serde(default = "default_true")]
    pub pull_on_login: bool,
}

fn default_base_url() -> String {
    "http://localhost:5001/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            pull_on_login: default_true(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sync: SyncOptions::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it doesn't exist.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.base_url.is_empty() {
            return Err(anyhow::anyhow!("server.base_url is required and cannot be empty"));
        }
        if !self.server.base_url.starts_with("http://") && !self.server.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "server.base_url must start with http:// or https://: {}",
                self.server.base_url
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(anyhow::anyhow!("server.timeout_secs must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            server: ServerConfig {
                base_url: "https://api.example.test/api".to_string(),
                timeout_secs: 10,
            },
            sync: SyncOptions { pull_on_login: false },
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.server.base_url, "https://api.example.test/api");
        assert_eq!(loaded.server.timeout_secs, 10);
        assert_eq!(loaded.sync.pull_on_login, false);
    }

    #[test]
    fn test_config_load_or_default_missing_file() {
        let path = PathBuf::from("/nonexistent/reelvault/config.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5001/api");
        assert!(config.sync.pull_on_login);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.server.base_url = String::new();
        assert!(config.validate().is_err());

        config.server.base_url = "localhost:5001".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "http://localhost:5001/api".to_string();
        config.server.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
