// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Tree synchronizer: full delete-and-recreate mirroring.
//!
//! The mirror lives under a single reserved-title folder (the *marker*)
//! attached to the host's "other bookmarks" folder. A resync is four
//! strictly sequential phases:
//!
//! ```text
//! sweep ─→ delete ─→ fetch ─→ create
//!   │         │         │        │
//!   │         │         │        └─ new marker + depth-first mirror
//!   │         │         └─ authoritative tree from the remote directory
//!   │         └─ every found marker subtree, recursively
//!   └─ full host-tree traversal for marker-titled folders, wherever
//!      they are (manual copies included)
//! ```
//!
//! Delete-and-recreate trades efficiency for a trivially checkable
//! invariant: after a successful resync the marker subtree *is* the last
//! fetched tree. There is no diffing and no sorting — the remote's array
//! order is authoritative and preserved exactly.
//!
//! A failed resync leaves one of two well-defined states, and logs which:
//! the pre-sync mirror (delete phase never completed) or no mirror at all
//! (delete done, a later phase failed). Callers retry by calling
//! [`TreeSynchronizer::resync`] again; there are no partial retries.

pub mod scheduler;

pub use scheduler::SyncScheduler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::host::{HostNode, HostTree, OTHER_BOOKMARKS_ID};
use crate::metrics;
use crate::remote::{RemoteDirectory, RemoteTreeNode};

/// Reserved title of the managed mirror folder. Any folder carrying this
/// title is considered owned by the sync process, wherever it sits.
pub const MARKER_FOLDER_TITLE: &str = "Bookmark Mirror";

/// Refuse trees nested deeper than this.
pub const MAX_TREE_DEPTH: usize = 64;

/// Knobs for [`TreeSynchronizer`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Title of the managed mirror folder.
    pub marker_title: String,
    /// Ask the remote for romanized names (display hint, forwarded as-is).
    pub romanize: bool,
    /// Maximum accepted namespace nesting.
    pub max_depth: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            marker_title: MARKER_FOLDER_TITLE.to_string(),
            romanize: true,
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

/// What a resync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Marker folders deleted during the sweep.
    pub deleted: usize,
    /// Namespace folders created (all depths; the marker itself not
    /// counted).
    pub folders: usize,
    /// Leaf bookmarks created.
    pub bookmarks: usize,
}

pub struct TreeSynchronizer {
    host: Arc<dyn HostTree>,
    remote: Arc<dyn RemoteDirectory>,
    options: SyncOptions,
    in_flight: AtomicBool,
}

impl TreeSynchronizer {
    pub fn new(host: Arc<dyn HostTree>, remote: Arc<dyn RemoteDirectory>) -> Self {
        Self::with_options(host, remote, SyncOptions::default())
    }

    pub fn with_options(
        host: Arc<dyn HostTree>,
        remote: Arc<dyn RemoteDirectory>,
        options: SyncOptions,
    ) -> Self {
        Self {
            host,
            remote,
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a resync is currently running.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Replace the mirror with the remote directory's current tree.
    ///
    /// Single-flight: a call that overlaps a running resync fails
    /// immediately with [`SyncError::SyncInFlight`] instead of
    /// interleaving delete/create phases.
    #[tracing::instrument(skip(self))]
    pub async fn resync(&self) -> Result<SyncReport, SyncError> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let started = Instant::now();
        info!(marker = %self.options.marker_title, "resync started");

        let deleted = self.delete_existing_mirrors().await?;

        let tree = match self.remote.fetch_tree(self.options.romanize).await {
            Ok(tree) => tree,
            Err(e) => {
                warn!(
                    error = %e,
                    deleted,
                    "remote fetch failed; host store is left with no mirror"
                );
                metrics::record_resync("fetch_failed");
                return Err(e);
            }
        };
        debug!(spaces = tree.len(), "remote tree fetched");

        let (folders, bookmarks) = match self.create_mirror(&tree).await {
            Ok(counts) => counts,
            Err(e) => {
                warn!(
                    error = %e,
                    "mirror creation failed; host store is left with no complete mirror"
                );
                metrics::record_resync("create_failed");
                return Err(e);
            }
        };

        metrics::record_resync("success");
        metrics::record_resync_duration(started.elapsed());
        metrics::record_nodes_created(folders, bookmarks);
        info!(
            deleted,
            folders,
            bookmarks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "resync finished"
        );
        Ok(SyncReport {
            deleted,
            folders,
            bookmarks,
        })
    }

    /// Sweep the whole host tree for marker folders and delete each one
    /// recursively. Returns how many were deleted.
    async fn delete_existing_mirrors(&self) -> Result<usize, SyncError> {
        let roots = match self.host.list_root().await {
            Ok(roots) => roots,
            Err(e) => {
                warn!(error = %e, "host enumeration failed; pre-sync mirror left in place");
                metrics::record_resync("sweep_failed");
                return Err(e);
            }
        };

        let mut markers = Vec::new();
        collect_marker_folders(&roots, &self.options.marker_title, &mut markers);
        info!(count = markers.len(), "marker folders found");

        for (index, marker_id) in markers.iter().enumerate() {
            if let Err(e) = self.host.remove_subtree(marker_id).await {
                warn!(
                    error = %e,
                    deleted = index,
                    remaining = markers.len() - index,
                    "marker deletion failed; pre-sync mirror left in place"
                );
                metrics::record_resync("delete_failed");
                return Err(e);
            }
        }

        Ok(markers.len())
    }

    /// Create a fresh marker folder under "other bookmarks" and mirror
    /// the remote tree beneath it, depth first, preserving order.
    async fn create_mirror(&self, tree: &[RemoteTreeNode]) -> Result<(usize, usize), SyncError> {
        let roots = self.host.list_root().await?;
        let attach_point = roots
            .first()
            .and_then(|root| {
                root.children
                    .iter()
                    .find(|child| child.id == OTHER_BOOKMARKS_ID && child.is_folder())
            })
            .ok_or_else(|| {
                SyncError::HostApi(format!(
                    "canonical \"other bookmarks\" folder (id {:?}) not found",
                    OTHER_BOOKMARKS_ID
                ))
            })?;

        let marker = self
            .host
            .create(&attach_point.id, &self.options.marker_title, None)
            .await?;
        debug!(id = %marker.id, "marker folder created");

        let mut folders = 0usize;
        let mut bookmarks = 0usize;

        // Explicit work stack instead of recursion: constructed nodes are
        // owned through their host-assigned parent id, and tree depth can
        // never threaten the call stack. Children are pushed in reverse so
        // the pop order matches the remote's declared order.
        let mut stack: Vec<(String, &RemoteTreeNode, usize)> = Vec::new();
        for node in tree.iter().rev() {
            stack.push((marker.id.clone(), node, 1));
        }

        while let Some((parent_id, node, depth)) = stack.pop() {
            if depth > self.options.max_depth {
                return Err(SyncError::Validation(format!(
                    "remote tree exceeds maximum depth {}",
                    self.options.max_depth
                )));
            }

            let folder = self
                .host
                .create(&parent_id, &node.space_name, None)
                .await?;
            folders += 1;

            for bookmark in &node.bookmarks {
                self.host
                    .create(&folder.id, &bookmark.name, Some(&bookmark.url))
                    .await?;
                bookmarks += 1;
            }

            for child in node.children.iter().rev() {
                stack.push((folder.id.clone(), child, depth + 1));
            }
        }

        Ok((folders, bookmarks))
    }
}

/// Collect ids of marker-titled folders, depth first. A matched folder's
/// subtree is not descended into: it is deleted wholesale, so a marker
/// nested inside another marker must not be scheduled twice.
fn collect_marker_folders(nodes: &[HostNode], title: &str, out: &mut Vec<String>) {
    for node in nodes {
        if node.is_folder() && node.title == title {
            out.push(node.id.clone());
            continue;
        }
        collect_marker_folders(&node.children, title, out);
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SyncError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(SyncError::SyncInFlight);
        }
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
