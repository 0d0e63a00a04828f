//! Page URL → favicon URL cache.
//!
//! Persisted as one JSON document: `{ "icons": { "<page url>": { url,
//! faviconUrl, timestamp } } }`. Reads filter out expired entries without
//! rewriting the document; writes stamp the current time and then prune —
//! expired entries dropped, and if the map still exceeds the bound the
//! newest entries by timestamp win (timestamp ties resolved by key order,
//! which is stable because the map is ordered).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::epoch_millis;
use crate::metrics;
use crate::storage::{KeyValueStore, StoreError};

/// Storage key of the icon map.
pub const ICON_CACHE_KEY: &str = "icon_cache";

/// How long a resolved icon stays valid.
pub const ICON_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Hard bound on cached icons.
pub const MAX_ICON_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedIcon {
    url: String,
    favicon_url: String,
    timestamp: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IconCacheData {
    icons: BTreeMap<String, CachedIcon>,
}

pub struct IconCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    max_entries: usize,
}

impl IconCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limits(store, ICON_TTL, MAX_ICON_ENTRIES)
    }

    /// Construct with custom TTL and entry bound (tests shrink both).
    pub fn with_limits(store: Arc<dyn KeyValueStore>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            store,
            ttl,
            max_entries,
        }
    }

    /// All non-expired mappings. Expired entries are filtered out of the
    /// result but left on disk; the next write prunes them.
    ///
    /// Never fails: a storage error yields an empty map.
    pub async fn get_all(&self) -> HashMap<String, String> {
        let data = match self.load().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "icon cache read failed, treating as empty");
                metrics::record_cache_event("icon", "error");
                return HashMap::new();
            }
        };

        let now = epoch_millis();
        let ttl_ms = self.ttl.as_millis() as u64;
        data.icons
            .into_iter()
            .filter(|(_, icon)| now.saturating_sub(icon.timestamp) < ttl_ms)
            .map(|(url, icon)| (url, icon.favicon_url))
            .collect()
    }

    /// Insert or refresh one mapping, then prune.
    pub async fn put(&self, url: &str, favicon_url: &str) -> Result<(), StoreError> {
        let mut data = self.load().await?;
        let now = epoch_millis();
        data.icons.insert(
            url.to_string(),
            CachedIcon {
                url: url.to_string(),
                favicon_url: favicon_url.to_string(),
                timestamp: now,
            },
        );
        self.prune(&mut data, now);
        self.save(&data).await
    }

    /// Insert or refresh a batch of mappings with one read-modify-write,
    /// then prune.
    pub async fn put_batch(&self, icons: &HashMap<String, String>) -> Result<(), StoreError> {
        if icons.is_empty() {
            return Ok(());
        }

        let mut data = self.load().await?;
        let now = epoch_millis();
        for (url, favicon_url) in icons {
            data.icons.insert(
                url.clone(),
                CachedIcon {
                    url: url.clone(),
                    favicon_url: favicon_url.clone(),
                    timestamp: now,
                },
            );
        }
        self.prune(&mut data, now);
        self.save(&data).await?;
        debug!(count = icons.len(), "icon cache batch updated");
        Ok(())
    }

    /// Drop the whole map.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(ICON_CACHE_KEY).await
    }

    async fn load(&self) -> Result<IconCacheData, StoreError> {
        match self.store.get(ICON_CACHE_KEY).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(data) => Ok(data),
                Err(e) => {
                    // A corrupt document is recoverable: start over.
                    warn!(error = %e, "icon cache document is malformed, resetting");
                    metrics::record_cache_event("icon", "corrupt");
                    Ok(IconCacheData::default())
                }
            },
            None => Ok(IconCacheData::default()),
        }
    }

    async fn save(&self, data: &IconCacheData) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(data).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(ICON_CACHE_KEY, value).await?;
        metrics::set_icon_cache_entries(data.icons.len());
        Ok(())
    }

    /// Drop expired entries, then enforce the size bound keeping the
    /// newest by timestamp. Ties fall back to key order, which the
    /// ordered map makes stable across runs.
    fn prune(&self, data: &mut IconCacheData, now: u64) {
        let ttl_ms = self.ttl.as_millis() as u64;
        let before = data.icons.len();
        data.icons
            .retain(|_, icon| now.saturating_sub(icon.timestamp) < ttl_ms);

        if data.icons.len() > self.max_entries {
            let mut entries: Vec<(String, CachedIcon)> =
                std::mem::take(&mut data.icons).into_iter().collect();
            entries.sort_by(|(key_a, a), (key_b, b)| {
                b.timestamp.cmp(&a.timestamp).then_with(|| key_a.cmp(key_b))
            });
            entries.truncate(self.max_entries);
            data.icons = entries.into_iter().collect();
        }

        let evicted = before.saturating_sub(data.icons.len());
        if evicted > 0 {
            debug!(evicted, kept = data.icons.len(), "icon cache pruned");
            metrics::record_icon_evictions(evicted);
        }
    }
}
