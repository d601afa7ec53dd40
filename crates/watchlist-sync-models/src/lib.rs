pub mod history;
pub mod item_type;
pub mod session;
pub mod watchlist;

pub use history::HistoryEntry;
pub use item_type::ItemType;
pub use session::{Session, User};
pub use watchlist::WatchlistEntry;
