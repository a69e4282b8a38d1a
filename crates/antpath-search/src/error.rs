use thiserror::Error;

use crate::session::SessionId;

/// Misuse of a search, session or scheduler.
///
/// Finding no path is not an error: a search that exhausts its open set
/// completes normally with an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// `advance` was called before any `start_search`.
    #[error("search has not been started")]
    NotStarted,
    /// Path results were queried before the search completed.
    #[error("search is not complete")]
    NotComplete,
    /// A path index past the end of the result path.
    #[error("path index {index} out of range for path of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// A start or end node that does not belong to the searched grid.
    #[error("node ({x}, {y}) does not belong to the searched grid")]
    ForeignNode { x: u32, y: u32 },
    /// A coordinate outside the grid.
    #[error("tile ({x}, {y}) is off the grid")]
    OffGrid { x: u32, y: u32 },
    /// No session with this id is registered.
    #[error("unknown search session {0}")]
    UnknownSession(SessionId),
}
