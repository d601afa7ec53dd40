use std::fmt;

/// User-facing outcome of a watchlist action. These replace the toasts of a
/// graphical client; background pull failures are deliberately log-only and
/// never produce a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Added { title: String },
    Removed { title: String },
    AlreadyListed { title: String },
    Rejected { reason: String },
    SyncFailed { title: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added { title } => write!(f, "{} added to My List", title),
            Notice::Removed { title } => write!(f, "{} removed from My List", title),
            Notice::AlreadyListed { title } => write!(f, "{} is already in your list", title),
            Notice::Rejected { reason } => write!(f, "Cannot add entry: {}", reason),
            Notice::SyncFailed { title } => {
                write!(f, "Failed to sync {} with the server. Try again.", title)
            }
        }
    }
}

/// Delivery channel for notices. The CLI renders them; tests record them.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sink that drops everything, for embedders that only care about state.
pub struct SilentSink;

impl NoticeSink for SilentSink {
    fn notify(&self, _notice: Notice) {}
}
