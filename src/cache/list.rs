// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Single-slot cache for the ranked bookmark list.
//!
//! There is exactly one cached list, stamped with the `limit` it was
//! fetched for. A request is served from the slot when the slot is fresh
//! and broad enough (recorded limit or stored count covers the request),
//! truncated to the requested size. A fresh-but-narrower slot is left in
//! place and the request reported as a miss, so a later broad fetch can
//! still land in the slot.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::epoch_millis;
use crate::metrics;
use crate::remote::RemoteBookmark;
use crate::storage::{KeyValueStore, StoreError};

/// Storage key of the list slot.
pub const LIST_CACHE_KEY: &str = "bookmarks_cache";

/// How long a cached list stays valid.
pub const LIST_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct CachedList {
    bookmarks: Vec<RemoteBookmark>,
    timestamp: u64,
    limit: usize,
}

pub struct BookmarkListCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl BookmarkListCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, LIST_TTL)
    }

    /// Construct with a custom TTL (tests exercise expiry with
    /// millisecond TTLs).
    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Serve the first `limit` cached bookmarks, or `None` on a miss.
    ///
    /// Never fails: storage errors and corrupt slots are logged and
    /// reported as misses. A stale slot is cleared as a side effect;
    /// a fresh slot that cannot cover `limit` is kept.
    pub async fn get(&self, limit: usize) -> Option<Vec<RemoteBookmark>> {
        let cached = match self.store.get(LIST_CACHE_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<CachedList>(value) {
                Ok(cached) => cached,
                Err(e) => {
                    warn!(error = %e, "list cache slot is malformed, treating as miss");
                    metrics::record_cache_event("list", "corrupt");
                    return None;
                }
            },
            Ok(None) => {
                metrics::record_cache_event("list", "miss");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "list cache read failed, treating as miss");
                metrics::record_cache_event("list", "error");
                return None;
            }
        };

        let age = epoch_millis().saturating_sub(cached.timestamp);
        if age > self.ttl.as_millis() as u64 {
            debug!(age_ms = age, "list cache slot expired, clearing");
            metrics::record_cache_event("list", "expired");
            if let Err(e) = self.store.remove(LIST_CACHE_KEY).await {
                warn!(error = %e, "failed to clear expired list cache slot");
            }
            return None;
        }

        if cached.limit >= limit || cached.bookmarks.len() >= limit {
            metrics::record_cache_event("list", "hit");
            let mut bookmarks = cached.bookmarks;
            bookmarks.truncate(limit);
            Some(bookmarks)
        } else {
            // Fresh but too narrow; leave the slot for what it can serve.
            debug!(
                cached = cached.bookmarks.len(),
                requested = limit,
                "list cache slot too narrow"
            );
            metrics::record_cache_event("list", "narrow");
            None
        }
    }

    /// Replace the slot with `bookmarks`, stamped with `limit` and now.
    pub async fn put(
        &self,
        bookmarks: &[RemoteBookmark],
        limit: usize,
    ) -> Result<(), StoreError> {
        let record = CachedList {
            bookmarks: bookmarks.to_vec(),
            timestamp: epoch_millis(),
            limit,
        };
        let value =
            serde_json::to_value(&record).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(LIST_CACHE_KEY, value).await?;
        debug!(count = record.bookmarks.len(), limit, "list cache updated");
        Ok(())
    }

    /// Drop the slot.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(LIST_CACHE_KEY).await
    }
}
