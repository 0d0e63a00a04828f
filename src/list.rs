//! Cache-first reads of the ranked bookmark list.
//!
//! The surface rendering "most visited" entries goes through
//! [`BookmarkListService`]: a fresh-and-broad-enough cache slot answers
//! without a network round trip, anything else falls back to the remote
//! directory and repopulates the slot. Search and visit counting are thin
//! passthroughs — only the ranked list is worth caching.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::BookmarkListCache;
use crate::error::SyncError;
use crate::remote::{RemoteBookmark, RemoteDirectory};
use crate::storage::StoreError;

pub struct BookmarkListService {
    remote: Arc<dyn RemoteDirectory>,
    cache: BookmarkListCache,
}

impl BookmarkListService {
    pub fn new(remote: Arc<dyn RemoteDirectory>, cache: BookmarkListCache) -> Self {
        Self { remote, cache }
    }

    /// The top `limit` bookmarks by visit count, cached for the list TTL.
    pub async fn most_visited(&self, limit: usize) -> Result<Vec<RemoteBookmark>, SyncError> {
        if let Some(cached) = self.cache.get(limit).await {
            debug!(limit, served = cached.len(), "most-visited served from cache");
            return Ok(cached);
        }

        let mut fetched = self.remote.most_visited(limit, None).await?;
        if let Err(e) = self.cache.put(&fetched, limit).await {
            // A failed cache write only costs the next call a fetch.
            warn!(error = %e, "failed to cache most-visited list");
        }
        fetched.truncate(limit);
        Ok(fetched)
    }

    /// Full-text search, always live.
    pub async fn search(&self, query: &str) -> Result<Vec<RemoteBookmark>, SyncError> {
        self.remote.search(Some(query)).await
    }

    /// Bump a bookmark's visit counter on the service.
    pub async fn record_visit(&self, id: &str) -> Result<(), SyncError> {
        self.remote.increment_usage(id).await
    }

    /// Drop the cached list, forcing the next read to fetch.
    pub async fn invalidate(&self) -> Result<(), StoreError> {
        self.cache.clear().await
    }
}
