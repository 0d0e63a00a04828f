//! Property-based tests for the mirror engine.
//!
//! Random bounded remote trees are resynced against a fresh in-memory
//! host store, and the resulting mirror must match the tree exactly —
//! shape, order, and reported counts. Wire types are additionally fuzzed
//! with arbitrary JSON to confirm they fail cleanly instead of panicking.
//!
//! Run with: `cargo test --test proptest_fuzz`

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::Value;

use bookmark_mirror::{
    HostNode, HostTree, InMemoryHostTree, NewBookmark, RemoteBookmark, RemoteDirectory,
    RemoteTreeNode, SyncError, SyncReport, TreeSynchronizer, MARKER_FOLDER_TITLE,
};

// =============================================================================
// Strategies for generating remote trees
// =============================================================================

fn bookmark_strategy() -> impl Strategy<Value = RemoteBookmark> {
    ("[a-z]{1,8}", "[a-z]{1,8}", 0u64..10_000).prop_map(|(name, host, num)| RemoteBookmark {
        id: format!("id-{}", name),
        namespace_id: String::new(),
        name,
        url: format!("https://{}.example.net/", host),
        description: String::new(),
        icon: String::new(),
        num,
        star: false,
        tags: Vec::new(),
    })
}

fn node_strategy() -> impl Strategy<Value = RemoteTreeNode> {
    let leaf = ("[a-z]{1,8}", prop::collection::vec(bookmark_strategy(), 0..4)).prop_map(
        |(name, bookmarks)| RemoteTreeNode {
            space_id: String::new(),
            space_name: name,
            space_description: String::new(),
            bookmarks,
            children: Vec::new(),
        },
    );

    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            "[a-z]{1,8}",
            prop::collection::vec(bookmark_strategy(), 0..4),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(name, bookmarks, children)| RemoteTreeNode {
                space_id: String::new(),
                space_name: name,
                space_description: String::new(),
                bookmarks,
                children,
            })
    })
}

fn tree_strategy() -> impl Strategy<Value = Vec<RemoteTreeNode>> {
    prop::collection::vec(node_strategy(), 0..4)
}

// =============================================================================
// Helpers
// =============================================================================

struct StaticRemote(Vec<RemoteTreeNode>);

#[async_trait]
impl RemoteDirectory for StaticRemote {
    async fn fetch_tree(&self, _: bool) -> Result<Vec<RemoteTreeNode>, SyncError> {
        Ok(self.0.clone())
    }
    async fn most_visited(
        &self,
        _: usize,
        _: Option<&str>,
    ) -> Result<Vec<RemoteBookmark>, SyncError> {
        Ok(Vec::new())
    }
    async fn search(&self, _: Option<&str>) -> Result<Vec<RemoteBookmark>, SyncError> {
        Ok(Vec::new())
    }
    async fn add_bookmark(&self, _: &NewBookmark) -> Result<RemoteBookmark, SyncError> {
        Err(SyncError::Network("static".into()))
    }
    async fn increment_usage(&self, _: &str) -> Result<(), SyncError> {
        Ok(())
    }
    async fn favicon_url(&self, _: &str) -> Result<String, SyncError> {
        Err(SyncError::Network("static".into()))
    }
}

/// Depth-first (depth, title, url) flattening of a remote tree, bookmarks
/// before children — the exact creation order of the mirror.
fn flatten_remote(tree: &[RemoteTreeNode], depth: usize, out: &mut Vec<(usize, String, Option<String>)>) {
    for node in tree {
        out.push((depth, node.space_name.clone(), None));
        for bookmark in &node.bookmarks {
            out.push((depth + 1, bookmark.name.clone(), Some(bookmark.url.clone())));
        }
        flatten_remote(&node.children, depth + 1, out);
    }
}

/// Same flattening of a host subtree.
fn flatten_host(nodes: &[HostNode], depth: usize, out: &mut Vec<(usize, String, Option<String>)>) {
    for node in nodes {
        out.push((depth, node.title.clone(), node.url.clone()));
        flatten_host(&node.children, depth + 1, out);
    }
}

fn count_tree(tree: &[RemoteTreeNode]) -> (usize, usize) {
    let mut folders = 0;
    let mut bookmarks = 0;
    for node in tree {
        folders += 1;
        bookmarks += node.bookmarks.len();
        let (f, b) = count_tree(&node.children);
        folders += f;
        bookmarks += b;
    }
    (folders, bookmarks)
}

fn find_marker(nodes: &[HostNode]) -> Option<HostNode> {
    for node in nodes {
        if node.is_folder() && node.title == MARKER_FOLDER_TITLE {
            return Some(node.clone());
        }
        if let Some(found) = find_marker(&node.children) {
            return Some(found);
        }
    }
    None
}

/// Run `resync` against a fresh host and return (report, marker shape).
fn resync_once(tree: Vec<RemoteTreeNode>) -> (SyncReport, Vec<(usize, String, Option<String>)>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    runtime.block_on(async {
        let host = Arc::new(InMemoryHostTree::new());
        let synchronizer = TreeSynchronizer::new(host.clone(), Arc::new(StaticRemote(tree)));
        let report = synchronizer.resync().await.expect("resync");

        let roots = host.list_root().await.expect("list_root");
        let marker = find_marker(&roots).expect("marker folder");
        let mut shape = Vec::new();
        flatten_host(&marker.children, 1, &mut shape);
        (report, shape)
    })
}

// =============================================================================
// Mirror shape properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The mirror's shape equals the remote tree exactly, and the report
    /// counts are the true counts.
    #[test]
    fn prop_mirror_matches_tree(tree in tree_strategy()) {
        let (folders, bookmarks) = count_tree(&tree);
        let mut expected = Vec::new();
        flatten_remote(&tree, 1, &mut expected);

        let (report, shape) = resync_once(tree);

        prop_assert_eq!(report.folders, folders);
        prop_assert_eq!(report.bookmarks, bookmarks);
        prop_assert_eq!(shape, expected);
    }

    /// Resyncing twice against an unchanged tree reproduces the same
    /// shape (host-assigned ids differ, the shape must not).
    #[test]
    fn prop_resync_is_idempotent(tree in tree_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");

        let (first, second, deleted) = runtime.block_on(async {
            let host = Arc::new(InMemoryHostTree::new());
            let synchronizer =
                TreeSynchronizer::new(host.clone(), Arc::new(StaticRemote(tree)));

            synchronizer.resync().await.expect("first resync");
            let roots = host.list_root().await.expect("list_root");
            let mut first = Vec::new();
            flatten_host(&find_marker(&roots).expect("marker").children, 1, &mut first);

            let report = synchronizer.resync().await.expect("second resync");
            let roots = host.list_root().await.expect("list_root");
            let mut second = Vec::new();
            flatten_host(&find_marker(&roots).expect("marker").children, 1, &mut second);

            (first, second, report.deleted)
        });

        prop_assert_eq!(first, second);
        prop_assert_eq!(deleted, 1);
    }
}

// =============================================================================
// Wire type fuzzing
// =============================================================================

/// Generate arbitrary JSON values (including shapes we never produce)
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 10, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..10).prop_map(Value::Array),
            prop::collection::hash_map(".*", inner, 0..10)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Tree deserialization never panics on arbitrary bytes
    #[test]
    fn fuzz_tree_from_random_bytes(bytes in prop::collection::vec(any::<u8>(), 0..10000)) {
        let result: Result<Vec<RemoteTreeNode>, _> = serde_json::from_slice(&bytes);
        let _ = result;
    }

    /// Tree deserialization handles arbitrary JSON gracefully
    #[test]
    fn fuzz_tree_from_arbitrary_json(json in arbitrary_json_strategy()) {
        let result: Result<Vec<RemoteTreeNode>, _> =
            serde_json::from_value(json.clone());
        let _ = result;

        let result: Result<RemoteBookmark, _> = serde_json::from_value(json);
        let _ = result;
    }

    /// Serialization roundtrip preserves the tree
    #[test]
    fn prop_tree_roundtrip(tree in tree_strategy()) {
        let serialized = serde_json::to_string(&tree).expect("serialize");
        let deserialized: Vec<RemoteTreeNode> =
            serde_json::from_str(&serialized).expect("deserialize");
        prop_assert_eq!(tree, deserialized);
    }
}
