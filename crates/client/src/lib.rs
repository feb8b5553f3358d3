//! HTTP client for the remote schedule store.
//!
//! Blocking reqwest client (no async runtime required). The [`ScheduleStore`]
//! trait is the seam the sync layer programs against; [`StoreClient`] is the
//! production implementation, and tests substitute in-memory stores.

mod http;
mod store;
mod types;

pub use http::StoreClient;
pub use store::ScheduleStore;
pub use types::{CellWrite, RowPatch, SchedulePatch, ScheduleRecord};

/// Error type for remote store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Network error (DNS, connect, timeout).
    Network(String),
    /// HTTP error with status code.
    Http(u16, String),
    /// Response body did not parse.
    Parse(String),
    /// Server rejected the request (4xx with message).
    Validation(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "Network error: {}", msg),
            StoreError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            StoreError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StoreError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
