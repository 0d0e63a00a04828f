//! Error taxonomy for the mirror engine.
//!
//! [`SyncError`] covers every failure a caller of the synchronizer or the
//! remote client can observe. The storage layer has its own
//! [`StoreError`](crate::storage::StoreError) so cache read paths can
//! swallow storage failures (degrade to a miss) without losing the
//! distinction here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport failure reaching the remote service.
    #[error("network error: {0}")]
    Network(String),

    /// The remote service responded, but with a non-zero application code.
    #[error("remote service error (code {code}): {message}")]
    Application { code: i64, message: String },

    /// A local bookmark-store operation failed, including "canonical
    /// parent not found".
    #[error("host bookmark store error: {0}")]
    HostApi(String),

    /// Malformed input (bad URL, tree deeper than the configured limit).
    #[error("validation error: {0}")]
    Validation(String),

    /// Another resync is already running; the caller should wait for it
    /// to finish rather than interleave delete/create phases.
    #[error("a sync is already in progress")]
    SyncInFlight,
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err.to_string())
    }
}
