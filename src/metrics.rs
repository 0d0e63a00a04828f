// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation.
//!
//! Uses the `metrics` crate for backend-agnostic collection; the embedding
//! application chooses the exporter.
//!
//! # Metric Naming Convention
//! - `bookmark_mirror_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `status`: success, sweep_failed, delete_failed, fetch_failed, create_failed
//! - `cache`: list, icon
//! - `event`: hit, miss, expired, narrow, corrupt, error

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record a resync outcome
pub fn record_resync(status: &str) {
    counter!(
        "bookmark_mirror_resync_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record resync wall time
pub fn record_resync_duration(duration: Duration) {
    histogram!("bookmark_mirror_resync_seconds").record(duration.as_secs_f64());
}

/// Record nodes created by a successful resync
pub fn record_nodes_created(folders: usize, bookmarks: usize) {
    counter!(
        "bookmark_mirror_nodes_created_total",
        "kind" => "folder"
    )
    .increment(folders as u64);
    counter!(
        "bookmark_mirror_nodes_created_total",
        "kind" => "bookmark"
    )
    .increment(bookmarks as u64);
}

/// Record a cache lookup outcome
pub fn record_cache_event(cache: &str, event: &str) {
    counter!(
        "bookmark_mirror_cache_events_total",
        "cache" => cache.to_string(),
        "event" => event.to_string()
    )
    .increment(1);
}

/// Set current icon cache entry count
pub fn set_icon_cache_entries(count: usize) {
    gauge!("bookmark_mirror_icon_cache_entries").set(count as f64);
}

/// Record icon cache evictions (expiry + size bound)
pub fn record_icon_evictions(count: usize) {
    counter!("bookmark_mirror_icon_evictions_total").increment(count as u64);
}
