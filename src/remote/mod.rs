//! Remote bookmark directory client.
//!
//! [`RemoteDirectory`] is the seam between the engine and the bookmark
//! service. The synchronizer, list service, and icon resolver all take it
//! as `Arc<dyn RemoteDirectory>`, so tests substitute scripted fakes while
//! production wires in [`HttpRemoteDirectory`].

pub mod http;
pub mod types;

pub use http::HttpRemoteDirectory;
pub use types::{ApiEnvelope, NewBookmark, RemoteBookmark, RemoteTreeNode, Tag};

use async_trait::async_trait;

use crate::error::SyncError;

/// The authoritative bookmark service.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Fetch the full namespace tree. `romanize` asks the service to
    /// include romanized names for display purposes.
    async fn fetch_tree(&self, romanize: bool) -> Result<Vec<RemoteTreeNode>, SyncError>;

    /// Fetch the ranked "most visited" list, optionally filtered.
    async fn most_visited(
        &self,
        limit: usize,
        search: Option<&str>,
    ) -> Result<Vec<RemoteBookmark>, SyncError>;

    /// Full-text search over bookmarks.
    async fn search(&self, query: Option<&str>) -> Result<Vec<RemoteBookmark>, SyncError>;

    /// Upload a single bookmark.
    async fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<RemoteBookmark, SyncError>;

    /// Bump a bookmark's visit counter.
    async fn increment_usage(&self, id: &str) -> Result<(), SyncError>;

    /// Resolve a favicon URL for `domain` via the service's own favicon
    /// endpoint. Errors mean "no icon available", not a fatal condition.
    async fn favicon_url(&self, domain: &str) -> Result<String, SyncError>;
}
