pub mod coordinator;
pub mod notice;
pub mod snapshot;
pub mod state;

pub use coordinator::SyncCoordinator;
pub use notice::{Notice, NoticeSink};
pub use snapshot::SnapshotStore;
pub use state::WatchlistState;
