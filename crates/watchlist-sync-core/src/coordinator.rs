use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use watchlist_sync_models::{Session, WatchlistEntry};
use watchlist_sync_remote::RemoteStore;
use crate::notice::{Notice, NoticeSink};
use crate::snapshot::SnapshotStore;
use crate::state::WatchlistState;

/// Keeps the local snapshot eventually consistent with the remote store
/// while giving immediate (optimistic) feedback, and guarantees the
/// snapshot never silently diverges from a failed remote write.
///
/// Locking discipline: `state` is taken only for single atomic local steps
/// (append, remove, overwrite, revert) with the flush inside the lock
/// scope, and is never held across a remote await. Remote calls for
/// different items therefore proceed independently. A pull that overwrites
/// the snapshot while a mutation is in flight resolves as last-write-wins:
/// reverts are scoped to their own key and are idempotent, so they can
/// correct but never wholesale-undo a completed pull.
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    state: Mutex<WatchlistState>,
    snapshot: SnapshotStore,
    notices: Arc<dyn NoticeSink>,
}

impl SyncCoordinator {
    /// Build a coordinator over a remote store, reading the persisted
    /// snapshot into memory. The session starts unauthenticated.
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        snapshot: SnapshotStore,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        let entries = snapshot.load();
        Self {
            remote,
            state: Mutex::new(WatchlistState::new(entries, None)),
            snapshot,
            notices,
        }
    }

    fn state(&self) -> MutexGuard<'_, WatchlistState> {
        // Entries stay consistent across a panicking holder; recover instead
        // of propagating the poison
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, state: &WatchlistState) {
        if let Err(e) = self.snapshot.flush(&state.entries) {
            warn!("Failed to persist snapshot: {}", e);
        }
    }

    /// Set the session without pulling. Prefer [`attach_session`] on a
    /// transition to authenticated.
    ///
    /// [`attach_session`]: Self::attach_session
    pub fn set_session(&self, session: Option<Session>) {
        self.state().session = session;
    }

    /// Bind an authenticated session and pull the remote list, as on login
    /// or token restore.
    pub async fn attach_session(&self, session: Session) {
        debug!(user = %session.user.email, "Session attached");
        self.state().session = Some(session);
        self.pull_remote().await;
    }

    /// Drop the session and the device-local list, as on logout.
    pub fn sign_out(&self) {
        let mut state = self.state();
        state.session = None;
        state.entries.clear();
        self.flush(&state);
        info!("Signed out, local snapshot cleared");
    }

    /// Replace the entire local snapshot with the remote list. Without a
    /// session this is a no-op, not an error. Failures are logged and leave
    /// the snapshot stale-but-present; no notice is emitted for this
    /// background operation.
    #[instrument(skip(self))]
    pub async fn pull_remote(&self) {
        let token = match self.state().token() {
            Some(token) => token,
            None => {
                debug!("No session, skipping watchlist pull");
                return;
            }
        };

        match self.remote.list(&token).await {
            Ok(entries) => {
                let count = entries.len();
                {
                    let mut state = self.state();
                    state.entries = entries;
                    self.flush(&state);
                }
                info!(count, "Replaced local snapshot from remote watchlist");
            }
            Err(e) => {
                warn!("Watchlist pull failed, keeping local snapshot: {}", e);
            }
        }
    }

    /// Optimistically add an entry, then propagate when authenticated. On
    /// remote rejection or network failure the append is exactly reverted
    /// and a sync-failure notice emitted. The entry is settled (kept or
    /// reverted) when the returned future completes; adds of different
    /// items are independent.
    pub async fn add_entry(&self, entry: WatchlistEntry) {
        if entry.item_id == 0 || entry.title.trim().is_empty() {
            self.notices.notify(Notice::Rejected {
                reason: "an item id and a title are required".to_string(),
            });
            return;
        }

        let token = {
            let mut state = self.state();
            if state.contains_key(entry.key()) {
                drop(state);
                self.notices.notify(Notice::AlreadyListed {
                    title: entry.title.clone(),
                });
                return;
            }
            state.entries.push(entry.clone());
            self.flush(&state);
            state.token()
        };
        self.notices.notify(Notice::Added {
            title: entry.title.clone(),
        });

        // Unauthenticated: local-only, no network I/O
        let Some(token) = token else { return };

        if let Err(e) = self.remote.create(&token, &entry).await {
            warn!(item_id = entry.item_id, "Remote create failed, reverting: {}", e);
            {
                let mut state = self.state();
                state.remove_key(entry.key());
                self.flush(&state);
            }
            self.notices.notify(Notice::SyncFailed { title: entry.title });
        }
    }

    /// Optimistically remove the entry with this id, then propagate when
    /// authenticated. On remote failure the entry is re-inserted (append;
    /// ordering is not a guaranteed property) and a sync-failure notice
    /// emitted. Absent id is a no-op.
    pub async fn remove_entry(&self, item_id: u64) {
        let (removed, token) = {
            let mut state = self.state();
            let removed = state.remove_by_id(item_id);
            if removed.is_some() {
                self.flush(&state);
            }
            let token = state.token();
            (removed, token)
        };

        let Some(entry) = removed else {
            debug!(item_id, "Remove requested for item not in list");
            return;
        };
        self.notices.notify(Notice::Removed {
            title: entry.title.clone(),
        });

        let Some(token) = token else { return };

        if let Err(e) = self
            .remote
            .delete(&token, entry.item_id, entry.item_type)
            .await
        {
            warn!(item_id, "Remote delete failed, restoring entry: {}", e);
            {
                let mut state = self.state();
                if !state.contains_key(entry.key()) {
                    state.entries.push(entry.clone());
                }
                self.flush(&state);
            }
            self.notices.notify(Notice::SyncFailed { title: entry.title });
        }
    }

    /// Local membership predicate used by presentation code. No I/O.
    pub fn is_member(&self, item_id: u64) -> bool {
        self.state().contains_id(item_id)
    }

    /// Copy of the current snapshot for display.
    pub fn entries(&self) -> Vec<WatchlistEntry> {
        self.state().entries.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::future::join_all;
    use std::collections::HashSet;
    use watchlist_sync_models::{ItemType, User};
    use watchlist_sync_remote::RemoteError;
    use crate::notice::SilentSink;

    /// Remote store double with switchable failure modes. Failures are
    /// simulated as server errors; a create against an id the store already
    /// holds answers with the duplicate rejection the real backend sends.
    #[derive(Default)]
    struct MockRemote {
        entries: Mutex<Vec<WatchlistEntry>>,
        fail_create: bool,
        fail_delete: bool,
        fail_list: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockRemote {
        fn with_entries(entries: Vec<WatchlistEntry>) -> Self {
            Self {
                entries: Mutex::new(entries),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn stored(&self) -> Vec<WatchlistEntry> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteStore for MockRemote {
        async fn list(&self, _token: &str) -> Result<Vec<WatchlistEntry>, RemoteError> {
            self.calls.lock().unwrap().push("list");
            if self.fail_list {
                return Err(RemoteError::Api {
                    status: 500,
                    message: "simulated outage".to_string(),
                });
            }
            Ok(self.stored())
        }

        async fn create(
            &self,
            _token: &str,
            entry: &WatchlistEntry,
        ) -> Result<WatchlistEntry, RemoteError> {
            self.calls.lock().unwrap().push("create");
            if self.fail_create {
                return Err(RemoteError::Api {
                    status: 500,
                    message: "simulated outage".to_string(),
                });
            }
            let mut entries = self.entries.lock().unwrap();
            if entries.iter().any(|e| e.key() == entry.key()) {
                return Err(RemoteError::Duplicate("Item already in watchlist".to_string()));
            }
            entries.push(entry.clone());
            Ok(entry.clone())
        }

        async fn delete(
            &self,
            _token: &str,
            item_id: u64,
            item_type: ItemType,
        ) -> Result<(), RemoteError> {
            self.calls.lock().unwrap().push("delete");
            if self.fail_delete {
                return Err(RemoteError::Api {
                    status: 500,
                    message: "simulated outage".to_string(),
                });
            }
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.key() != (item_id, item_type));
            if entries.len() == before {
                return Err(RemoteError::NotFound("Item not found in watchlist".to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingSink {
        fn notices(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl NoticeSink for RecordingSink {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    fn session() -> Session {
        Session {
            token: "tok-test".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "ada@example.test".to_string(),
                name: "Ada".to_string(),
                avatar: None,
            },
        }
    }

    fn entry(item_id: u64, title: &str) -> WatchlistEntry {
        WatchlistEntry::new(item_id, ItemType::Movie, title)
    }

    fn build(
        remote: Arc<MockRemote>,
        dir: &tempfile::TempDir,
    ) -> (SyncCoordinator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let coordinator = SyncCoordinator::new(
            remote,
            SnapshotStore::new(dir.path().join("watchlist.json")),
            sink.clone(),
        );
        (coordinator, sink)
    }

    fn key_set(entries: &[WatchlistEntry]) -> HashSet<(u64, ItemType)> {
        entries.iter().map(|e| e.key()).collect()
    }

    #[tokio::test]
    async fn test_duplicate_add_keeps_one_copy_and_notices() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, sink) = build(Arc::new(MockRemote::default()), &dir);

        coordinator.add_entry(entry(1, "Inception")).await;
        coordinator.add_entry(entry(1, "Inception")).await;

        assert_eq!(coordinator.entries().len(), 1);
        assert_eq!(
            sink.notices(),
            vec![
                Notice::Added { title: "Inception".to_string() },
                Notice::AlreadyListed { title: "Inception".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_add_reverts_exactly_on_remote_failure() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote {
            fail_create: true,
            ..MockRemote::with_entries(vec![entry(1, "Heat")])
        });
        let (coordinator, sink) = build(remote, &dir);
        coordinator.attach_session(session()).await;
        let before = key_set(&coordinator.entries());

        coordinator.add_entry(entry(2, "Ronin")).await;

        // Set-equality with the pre-call snapshot, order-insensitive
        assert_eq!(key_set(&coordinator.entries()), before);
        assert!(sink
            .notices()
            .contains(&Notice::SyncFailed { title: "Ronin".to_string() }));
    }

    #[tokio::test]
    async fn test_add_reverts_on_remote_duplicate_conflict() {
        let dir = tempfile::tempdir().unwrap();
        // Remote already holds the item but the local snapshot does not
        // (stale local state), so the existence probe passes and the store's
        // uniqueness check is what rejects
        let remote = Arc::new(MockRemote::with_entries(vec![entry(3, "Alien")]));
        let (coordinator, sink) = build(remote, &dir);
        coordinator.set_session(Some(session()));

        coordinator.add_entry(entry(3, "Alien")).await;

        assert!(!coordinator.is_member(3));
        assert!(sink
            .notices()
            .contains(&Notice::SyncFailed { title: "Alien".to_string() }));
    }

    #[tokio::test]
    async fn test_remove_revert_restores_membership() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote {
            fail_delete: true,
            ..MockRemote::with_entries(vec![entry(7, "Brazil")])
        });
        let (coordinator, sink) = build(remote, &dir);
        coordinator.attach_session(session()).await;
        assert!(coordinator.is_member(7));

        coordinator.remove_entry(7).await;

        assert!(coordinator.is_member(7));
        assert!(sink
            .notices()
            .contains(&Notice::SyncFailed { title: "Brazil".to_string() }));
    }

    #[tokio::test]
    async fn test_unauthenticated_add_never_touches_remote() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        let (coordinator, sink) = build(remote.clone(), &dir);

        coordinator.add_entry(entry(9, "Stalker")).await;

        assert!(coordinator.is_member(9));
        assert!(remote.calls().is_empty());
        assert_eq!(
            sink.notices(),
            vec![Notice::Added { title: "Stalker".to_string() }]
        );
    }

    #[tokio::test]
    async fn test_pull_overwrites_prior_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::with_entries(vec![
            entry(1, "A"),
            entry(2, "B"),
        ]));
        let (coordinator, _sink) = build(remote, &dir);
        coordinator.add_entry(entry(3, "C")).await;

        coordinator.attach_session(session()).await;

        let keys = key_set(&coordinator.entries());
        assert_eq!(
            keys,
            HashSet::from([(1, ItemType::Movie), (2, ItemType::Movie)])
        );
    }

    #[tokio::test]
    async fn test_pull_failure_keeps_stale_snapshot_silently() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote {
            fail_list: true,
            ..MockRemote::default()
        });
        let (coordinator, sink) = build(remote, &dir);
        coordinator.add_entry(entry(4, "Local")).await;

        coordinator.attach_session(session()).await;

        assert!(coordinator.is_member(4));
        // Background failure: no user notice beyond the original add
        assert_eq!(
            sink.notices(),
            vec![Notice::Added { title: "Local".to_string() }]
        );
    }

    #[tokio::test]
    async fn test_membership_follows_add_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, _sink) = build(Arc::new(MockRemote::default()), &dir);

        assert!(!coordinator.is_member(11));
        coordinator.add_entry(entry(11, "Ran")).await;
        assert!(coordinator.is_member(11));
        coordinator.remove_entry(11).await;
        assert!(!coordinator.is_member(11));
    }

    #[tokio::test]
    async fn test_validation_rejected_before_any_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        let (coordinator, sink) = build(remote.clone(), &dir);
        coordinator.set_session(Some(session()));

        coordinator.add_entry(entry(12, "   ")).await;
        coordinator.add_entry(entry(0, "No Id")).await;

        assert!(coordinator.entries().is_empty());
        assert!(remote.calls().is_empty());
        assert!(matches!(sink.notices()[0], Notice::Rejected { .. }));
        assert_eq!(sink.notices().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_of_absent_item_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        let (coordinator, sink) = build(remote.clone(), &dir);
        coordinator.set_session(Some(session()));

        coordinator.remove_entry(99).await;

        assert!(remote.calls().is_empty());
        assert!(sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_of_different_items_all_settle() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        let (coordinator, _sink) = build(remote.clone(), &dir);
        coordinator.set_session(Some(session()));
        let coordinator = Arc::new(coordinator);

        let adds = (1..=5u64).map(|id| {
            let coordinator = coordinator.clone();
            async move {
                coordinator
                    .add_entry(entry(id, &format!("Item {}", id)))
                    .await;
            }
        });
        join_all(adds).await;

        assert_eq!(coordinator.entries().len(), 5);
        assert_eq!(remote.stored().len(), 5);
    }

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        {
            let (coordinator, _sink) = build(remote.clone(), &dir);
            coordinator.add_entry(entry(21, "Persisted")).await;
        }

        // Fresh coordinator over the same slot reads the flushed snapshot
        let coordinator = SyncCoordinator::new(
            remote,
            SnapshotStore::new(dir.path().join("watchlist.json")),
            Arc::new(SilentSink),
        );
        assert!(coordinator.is_member(21));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote::with_entries(vec![entry(1, "A")]));
        let (coordinator, _sink) = build(remote, &dir);
        coordinator.attach_session(session()).await;
        assert!(coordinator.is_authenticated());
        assert!(!coordinator.entries().is_empty());

        coordinator.sign_out();

        assert!(!coordinator.is_authenticated());
        assert!(coordinator.entries().is_empty());
        let store = SnapshotStore::new(dir.path().join("watchlist.json"));
        assert!(store.load().is_empty());
    }

    /// The example scenario: remote holds 42/"movie"/"Inception"; the empty
    /// local snapshot is filled by a pull; a remove under a simulated
    /// network failure reverts and records the failure notice.
    #[tokio::test]
    async fn test_pull_then_failed_remove_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemote {
            fail_delete: true,
            ..MockRemote::with_entries(vec![entry(42, "Inception")])
        });
        let (coordinator, sink) = build(remote, &dir);
        assert!(coordinator.entries().is_empty());

        coordinator.attach_session(session()).await;
        assert_eq!(coordinator.entries().len(), 1);
        assert!(coordinator.is_member(42));

        coordinator.remove_entry(42).await;

        assert!(coordinator.is_member(42));
        assert!(sink
            .notices()
            .contains(&Notice::SyncFailed { title: "Inception".to_string() }));
    }
}
