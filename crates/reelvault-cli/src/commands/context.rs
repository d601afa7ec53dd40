use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, warn};
use watchlist_sync_config::{Config, PathManager, SessionStore};
use watchlist_sync_core::{SnapshotStore, SyncCoordinator};
use watchlist_sync_models::Session;
use watchlist_sync_remote::BackendClient;
use crate::output::{Output, Toasts};

/// Everything a command needs: resolved paths, config, and the backend
/// client built from it.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub client: BackendClient,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create app directories: {}", e))?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

        let client = BackendClient::new(&config.server.base_url, config.server.timeout_secs)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            paths,
            config,
            client,
        })
    }

    pub fn session_store(&self) -> Result<SessionStore> {
        let mut store = SessionStore::new(self.paths.session_file());
        store
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load session file: {}", e))?;
        Ok(store)
    }

    /// Restore the persisted session, validating the token against the
    /// backend as the app does at boot. A token that fails validation is
    /// cleared from the store.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        let mut store = self.session_store()?;
        let Some(stored) = store.session() else {
            return Ok(None);
        };

        match self.client.current_user(&stored.token).await {
            Ok(user) => {
                debug!(email = %user.email, "Restored session from disk");
                Ok(Some(Session {
                    token: stored.token,
                    user,
                }))
            }
            Err(e) => {
                warn!("Stored session failed validation, clearing it: {}", e);
                store
                    .clear()
                    .map_err(|e| color_eyre::eyre::eyre!("Failed to clear session file: {}", e))?;
                Ok(None)
            }
        }
    }

    /// Token for commands that call the backend directly.
    pub async fn require_token(&self) -> Result<String> {
        match self.restore_session().await? {
            Some(session) => Ok(session.token),
            None => Err(color_eyre::eyre::eyre!(
                "Not signed in. Run 'reelvault login' first"
            )),
        }
    }

    /// A coordinator over the backend and the on-disk snapshot, with
    /// notices rendered through the CLI output. Starts unauthenticated.
    pub fn coordinator(&self, output: &Output) -> SyncCoordinator {
        SyncCoordinator::new(
            Arc::new(self.client.clone()),
            SnapshotStore::new(self.paths.snapshot_file()),
            Arc::new(Toasts::new(*output)),
        )
    }

    /// A coordinator with the stored session attached, pulling the remote
    /// list when configured to (the authenticated-transition trigger).
    pub async fn coordinator_with_session(&self, output: &Output) -> Result<SyncCoordinator> {
        let coordinator = self.coordinator(output);
        if let Some(session) = self.restore_session().await? {
            if self.config.sync.pull_on_login {
                coordinator.attach_session(session).await;
            } else {
                coordinator.set_session(Some(session));
            }
        }
        Ok(coordinator)
    }
}
