//! Time-boxed caches in front of the remote directory.
//!
//! Two independent caches, each a JSON document under a fixed key in the
//! injected [`KeyValueStore`](crate::storage::KeyValueStore):
//!
//! - [`BookmarkListCache`]: a single slot holding the most recent ranked
//!   list fetch, valid for five minutes. One slot is enough because a
//!   broad fetch serves any narrower request by truncation.
//! - [`IconCache`]: page URL → favicon URL, valid for seven days and
//!   bounded to 1000 entries, newest kept.
//!
//! Read paths never fail: a storage error or corrupt document degrades to
//! a miss (logged), and only writes surface storage errors to callers.

pub mod icon;
pub mod list;

pub use icon::IconCache;
pub use list::BookmarkListCache;

pub(crate) fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
