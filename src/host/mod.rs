//! Local bookmark store adapter.
//!
//! The host store owns node identity: ids are assigned on `create` and are
//! the only stable handle. The engine never invents ids, it only records
//! the ones the host returns.
//!
//! The real adapter wraps whatever bookmark store the embedding surface
//! provides (a browser profile, a desktop bookmark database). The crate
//! ships [`InMemoryHostTree`], a faithful in-process model used by tests
//! and demos.

pub mod memory;

pub use memory::InMemoryHostTree;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Id of the invisible tree root.
pub const HOST_ROOT_ID: &str = "0";
/// Id of the "bookmarks bar" folder.
pub const BOOKMARKS_BAR_ID: &str = "1";
/// Id of the "other bookmarks" folder — the canonical attachment point
/// for the mirror.
pub const OTHER_BOOKMARKS_ID: &str = "2";

/// A node in the host bookmark tree.
///
/// `url` present ⇒ leaf bookmark; absent ⇒ folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub children: Vec<HostNode>,
}

impl HostNode {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Primitive tree operations against the host bookmark store.
#[async_trait]
pub trait HostTree: Send + Sync {
    /// Enumerate the full tree from its root(s), children populated
    /// recursively.
    async fn list_root(&self) -> Result<Vec<HostNode>, SyncError>;

    /// Create a folder (`url = None`) or leaf bookmark under `parent_id`.
    /// Returns the created node with its host-assigned id.
    async fn create(
        &self,
        parent_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<HostNode, SyncError>;

    /// Delete a node and its entire subtree.
    async fn remove_subtree(&self, id: &str) -> Result<(), SyncError>;
}
