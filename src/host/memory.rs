//! In-process host bookmark store.
//!
//! Models the host's conventions: an invisible root (`"0"`) with two
//! well-known folders under it, a bookmarks bar (`"1"`) and "other
//! bookmarks" (`"2"`), and monotonically assigned string ids. Used by
//! tests and demos; also carries failure knobs so tests can exercise the
//! synchronizer's abort paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{HostNode, HostTree, BOOKMARKS_BAR_ID, HOST_ROOT_ID, OTHER_BOOKMARKS_ID};
use crate::error::SyncError;

struct StoredNode {
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    /// Child ids in insertion order.
    children: Vec<String>,
}

struct Inner {
    nodes: HashMap<String, StoredNode>,
    next_id: u64,
}

pub struct InMemoryHostTree {
    inner: Mutex<Inner>,
    fail_removals: AtomicBool,
    /// Remaining successful creates before injected failures kick in
    /// (usize::MAX = never fail).
    creates_left: AtomicUsize,
}

impl InMemoryHostTree {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            HOST_ROOT_ID.to_string(),
            StoredNode {
                parent_id: None,
                title: String::new(),
                url: None,
                children: vec![BOOKMARKS_BAR_ID.to_string(), OTHER_BOOKMARKS_ID.to_string()],
            },
        );
        nodes.insert(
            BOOKMARKS_BAR_ID.to_string(),
            StoredNode {
                parent_id: Some(HOST_ROOT_ID.to_string()),
                title: "Bookmarks bar".to_string(),
                url: None,
                children: Vec::new(),
            },
        );
        nodes.insert(
            OTHER_BOOKMARKS_ID.to_string(),
            StoredNode {
                parent_id: Some(HOST_ROOT_ID.to_string()),
                title: "Other bookmarks".to_string(),
                url: None,
                children: Vec::new(),
            },
        );

        Self {
            inner: Mutex::new(Inner { nodes, next_id: 3 }),
            fail_removals: AtomicBool::new(false),
            creates_left: AtomicUsize::new(usize::MAX),
        }
    }

    /// Make every subsequent `remove_subtree` fail.
    pub fn set_fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    /// Allow `n` more successful `create` calls, then fail the rest.
    pub fn fail_creates_after(&self, n: usize) {
        self.creates_left.store(n, Ordering::SeqCst);
    }

    /// Total node count, the three built-in folders included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    fn build_node(inner: &Inner, id: &str) -> HostNode {
        let stored = &inner.nodes[id];
        HostNode {
            id: id.to_string(),
            parent_id: stored.parent_id.clone(),
            title: stored.title.clone(),
            url: stored.url.clone(),
            children: stored
                .children
                .iter()
                .map(|child| Self::build_node(inner, child))
                .collect(),
        }
    }

    fn collect_subtree(inner: &Inner, id: &str, out: &mut Vec<String>) {
        out.push(id.to_string());
        if let Some(stored) = inner.nodes.get(id) {
            for child in &stored.children {
                Self::collect_subtree(inner, child, out);
            }
        }
    }
}

impl Default for InMemoryHostTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostTree for InMemoryHostTree {
    async fn list_root(&self) -> Result<Vec<HostNode>, SyncError> {
        let inner = self.inner.lock();
        Ok(vec![Self::build_node(&inner, HOST_ROOT_ID)])
    }

    async fn create(
        &self,
        parent_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<HostNode, SyncError> {
        let left = self.creates_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(SyncError::HostApi("injected create failure".into()));
        }
        if left != usize::MAX {
            self.creates_left.store(left - 1, Ordering::SeqCst);
        }

        let mut inner = self.inner.lock();

        match inner.nodes.get(parent_id) {
            None => {
                return Err(SyncError::HostApi(format!(
                    "parent node '{}' not found",
                    parent_id
                )))
            }
            Some(parent) if parent.url.is_some() => {
                return Err(SyncError::HostApi(format!(
                    "parent node '{}' is a bookmark, not a folder",
                    parent_id
                )))
            }
            Some(_) => {}
        }

        let id = inner.next_id.to_string();
        inner.next_id += 1;

        inner.nodes.insert(
            id.clone(),
            StoredNode {
                parent_id: Some(parent_id.to_string()),
                title: title.to_string(),
                url: url.map(str::to_string),
                children: Vec::new(),
            },
        );
        if let Some(parent) = inner.nodes.get_mut(parent_id) {
            parent.children.push(id.clone());
        }

        Ok(HostNode {
            id,
            parent_id: Some(parent_id.to_string()),
            title: title.to_string(),
            url: url.map(str::to_string),
            children: Vec::new(),
        })
    }

    async fn remove_subtree(&self, id: &str) -> Result<(), SyncError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(SyncError::HostApi("injected removal failure".into()));
        }
        if matches!(id, HOST_ROOT_ID | BOOKMARKS_BAR_ID | OTHER_BOOKMARKS_ID) {
            return Err(SyncError::HostApi(format!(
                "node '{}' is a permanent folder",
                id
            )));
        }

        let mut inner = self.inner.lock();
        if !inner.nodes.contains_key(id) {
            return Err(SyncError::HostApi(format!("node '{}' not found", id)));
        }

        let mut doomed = Vec::new();
        Self::collect_subtree(&inner, id, &mut doomed);

        let parent_id = inner.nodes[id].parent_id.clone();
        for node_id in &doomed {
            inner.nodes.remove(node_id);
        }
        if let Some(parent_id) = parent_id {
            if let Some(parent) = inner.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| child != id);
            }
        }

        Ok(())
    }
}
