//! # Bookmark Mirror
//!
//! Mirrors a remote hierarchical bookmark directory into a local bookmark
//! tree, and keeps a locally-cached lookup layer for "most visited"
//! bookmarks and their icons so user-facing surfaces never wait on a
//! network round trip.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │          Remote Directory            │
//!                  │  fetch_tree / most_visited / favicon │
//!                  └──────────────────────────────────────┘
//!                       │                │            │
//!            (resync)   │                │            │
//!                       ▼                ▼            ▼
//! ┌─────────────────────────────┐ ┌────────────┐ ┌────────────┐
//! │      Tree Synchronizer      │ │ List Cache │ │ Icon Cache │
//! │  sweep → delete → fetch →   │ │  (5 min,   │ │ (7 days,   │
//! │  create, single-flight      │ │  one slot) │ │ 1000 max)  │
//! └─────────────────────────────┘ └────────────┘ └────────────┘
//!                │                      ▲              ▲
//!                ▼                      │              │
//! ┌─────────────────────────────┐ ┌────────────┐ ┌────────────┐
//! │      Host Bookmark Tree     │ │ List Srvc  │ │ Icon Rslvr │
//! │  (mirror under the marker   │ │ cache-first│ │ source +   │
//! │   folder, exact copy)       │ │ most-visitd│ │ default    │
//! └─────────────────────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! The synchronizer replaces the whole mirror on every run
//! (delete-and-recreate, never diffing): after a successful
//! [`TreeSynchronizer::resync`] the marker subtree *is* the last fetched
//! remote tree, which makes the core invariant trivially checkable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bookmark_mirror::{
//!     ConfigStore, HttpRemoteDirectory, InMemoryHostTree, SyncConfig, TreeSynchronizer,
//! };
//! use bookmark_mirror::storage::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let config = Arc::new(ConfigStore::new(store.clone()));
//!     config
//!         .set(&SyncConfig {
//!             server_url: "https://bookmarks.example.net/api".into(),
//!             api_key: "k-123".into(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let remote = Arc::new(HttpRemoteDirectory::new(config.clone()));
//!     let host = Arc::new(InMemoryHostTree::new());
//!
//!     let synchronizer = TreeSynchronizer::new(host, remote);
//!     let report = synchronizer.resync().await?;
//!     println!(
//!         "deleted {}, created {} folders / {} bookmarks",
//!         report.deleted, report.folders, report.bookmarks
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`sync`]: the [`TreeSynchronizer`] and the background [`SyncScheduler`]
//! - [`cache`]: [`BookmarkListCache`] and [`IconCache`]
//! - [`icon`]: the never-failing [`IconResolver`]
//! - [`list`]: cache-first [`BookmarkListService`]
//! - [`remote`]: the [`RemoteDirectory`] seam and its HTTP implementation
//! - [`host`]: the [`HostTree`] seam and the in-memory model
//! - [`storage`]: key-value persistence backends
//! - [`config`]: connection settings and their persistence

pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod icon;
pub mod list;
pub mod metrics;
pub mod remote;
pub mod storage;
pub mod sync;

pub use cache::{BookmarkListCache, IconCache};
pub use config::{ConfigStore, IconSource, SyncConfig};
pub use error::SyncError;
pub use host::{HostNode, HostTree, InMemoryHostTree};
pub use icon::{IconResolver, DEFAULT_ICON};
pub use list::BookmarkListService;
pub use remote::{
    HttpRemoteDirectory, NewBookmark, RemoteBookmark, RemoteDirectory, RemoteTreeNode,
};
pub use sync::{SyncOptions, SyncReport, SyncScheduler, TreeSynchronizer, MARKER_FOLDER_TITLE};
