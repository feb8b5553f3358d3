//! Editing session over a schedule: optimistic local edits, a deduplicating
//! pending-change buffer, a debounce/max-wait flush scheduler, and chunked
//! reconciliation against the remote store.
//!
//! Everything is single-writer and synchronous. The host (a UI event loop
//! or the CLI) owns the session, calls [`EditSession::edit_cell`] as keys
//! are committed, and polls [`EditSession::poll`] from its tick; the
//! scheduler owns no threads or timers.

pub mod pending;
pub mod scheduler;
pub mod session;
pub mod state;

pub use pending::{PendingBuffer, PendingChange};
pub use scheduler::FlushScheduler;
pub use session::{EditSession, FlushReport};
pub use state::ConfirmedCells;

use shiftgrid_client::StoreError;

/// Error type for sync operations.
#[derive(Debug)]
pub enum SyncError {
    /// A flush chunk failed. Chunks before it are already reconciled;
    /// the rest of the flush was aborted.
    Flush {
        chunks_done: usize,
        source: StoreError,
    },
    /// A row or schedule mutation failed; local state is unchanged.
    Store(StoreError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Flush { source, .. } => write!(f, "Schedule sync failed: {}", source),
            SyncError::Store(source) => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Flush { source, .. } | SyncError::Store(source) => Some(source),
        }
    }
}
