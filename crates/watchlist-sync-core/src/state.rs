use watchlist_sync_models::{ItemType, Session, WatchlistEntry};

/// Snapshot entries plus the session that gates remote propagation.
/// Constructed once per client session and torn down on sign-out. Every
/// mutation of `entries` must happen as one atomic step under the
/// coordinator's lock.
#[derive(Debug, Default)]
pub struct WatchlistState {
    pub entries: Vec<WatchlistEntry>,
    pub session: Option<Session>,
}

impl WatchlistState {
    pub fn new(entries: Vec<WatchlistEntry>, session: Option<Session>) -> Self {
        Self { entries, session }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    pub fn contains_id(&self, item_id: u64) -> bool {
        self.entries.iter().any(|e| e.item_id == item_id)
    }

    pub fn contains_key(&self, key: (u64, ItemType)) -> bool {
        self.entries.iter().any(|e| e.key() == key)
    }

    /// Remove the first entry with this id, returning it for the revert path.
    pub fn remove_by_id(&mut self, item_id: u64) -> Option<WatchlistEntry> {
        let index = self.entries.iter().position(|e| e.item_id == item_id)?;
        Some(self.entries.remove(index))
    }

    /// Remove the entry with this exact uniqueness key.
    pub fn remove_key(&mut self, key: (u64, ItemType)) -> Option<WatchlistEntry> {
        let index = self.entries.iter().position(|e| e.key() == key)?;
        Some(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_by_id_returns_removed_entry() {
        let mut state = WatchlistState::new(
            vec![
                WatchlistEntry::new(1, ItemType::Movie, "One"),
                WatchlistEntry::new(2, ItemType::Tv, "Two"),
            ],
            None,
        );

        let removed = state.remove_by_id(2).unwrap();
        assert_eq!(removed.title, "Two");
        assert_eq!(state.entries.len(), 1);
        assert!(state.remove_by_id(2).is_none());
    }

    #[test]
    fn test_contains_key_distinguishes_item_type() {
        let state = WatchlistState::new(
            vec![WatchlistEntry::new(5, ItemType::Movie, "Five")],
            None,
        );
        assert!(state.contains_key((5, ItemType::Movie)));
        assert!(!state.contains_key((5, ItemType::Tv)));
        assert!(state.contains_id(5));
    }

    #[test]
    fn test_token_requires_session() {
        let mut state = WatchlistState::default();
        assert!(state.token().is_none());
        assert!(!state.is_authenticated());

        state.session = Some(Session {
            token: "tok".to_string(),
            user: watchlist_sync_models::User {
                id: "u1".to_string(),
                email: "a@b.test".to_string(),
                name: "A".to_string(),
                avatar: None,
            },
        });
        assert_eq!(state.token().as_deref(), Some("tok"));
    }
}
