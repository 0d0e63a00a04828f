// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic bookmark-mirror usage example.
//!
//! Demonstrates:
//! 1. Wiring the engine with an in-memory host tree and a scripted remote
//! 2. Running a full resync and reading the report
//! 3. Serving the "most visited" list through the cache
//! 4. Resolving favicons with the cache-backed resolver
//!
//! Everything runs in-process — no server and no Redis required.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use bookmark_mirror::storage::InMemoryStore;
use bookmark_mirror::{
    BookmarkListCache, BookmarkListService, ConfigStore, HostTree, IconCache, IconResolver,
    InMemoryHostTree, NewBookmark, RemoteBookmark, RemoteDirectory, RemoteTreeNode, SyncError,
    TreeSynchronizer,
};

/// A stand-in for the bookmark server, serving a small fixed directory.
struct DemoRemote;

fn bookmark(name: &str, url: &str, num: u64) -> RemoteBookmark {
    RemoteBookmark {
        id: format!("id-{}", name),
        namespace_id: String::new(),
        name: name.to_string(),
        url: url.to_string(),
        description: String::new(),
        icon: String::new(),
        num,
        star: false,
        tags: Vec::new(),
    }
}

#[async_trait]
impl RemoteDirectory for DemoRemote {
    async fn fetch_tree(&self, _romanize: bool) -> Result<Vec<RemoteTreeNode>, SyncError> {
        Ok(vec![
            RemoteTreeNode {
                space_id: "s-1".into(),
                space_name: "Engineering".into(),
                space_description: "daily tools".into(),
                bookmarks: vec![
                    bookmark("CI", "https://ci.example.net/", 412),
                    bookmark("Wiki", "https://wiki.example.net/", 287),
                ],
                children: vec![RemoteTreeNode {
                    space_id: "s-2".into(),
                    space_name: "Oncall".into(),
                    space_description: String::new(),
                    bookmarks: vec![bookmark("Runbooks", "https://runbooks.example.net/", 95)],
                    children: Vec::new(),
                }],
            },
            RemoteTreeNode {
                space_id: "s-3".into(),
                space_name: "Reading".into(),
                space_description: String::new(),
                bookmarks: vec![bookmark("Blog", "https://blog.example.net/", 51)],
                children: Vec::new(),
            },
        ])
    }

    async fn most_visited(
        &self,
        limit: usize,
        _search: Option<&str>,
    ) -> Result<Vec<RemoteBookmark>, SyncError> {
        let mut all = vec![
            bookmark("CI", "https://ci.example.net/", 412),
            bookmark("Wiki", "https://wiki.example.net/", 287),
            bookmark("Runbooks", "https://runbooks.example.net/", 95),
            bookmark("Blog", "https://blog.example.net/", 51),
        ];
        all.truncate(limit);
        Ok(all)
    }

    async fn search(&self, _query: Option<&str>) -> Result<Vec<RemoteBookmark>, SyncError> {
        Ok(Vec::new())
    }

    async fn add_bookmark(&self, _bookmark: &NewBookmark) -> Result<RemoteBookmark, SyncError> {
        Err(SyncError::Network("demo remote is read-only".into()))
    }

    async fn increment_usage(&self, _id: &str) -> Result<(), SyncError> {
        Ok(())
    }

    async fn favicon_url(&self, domain: &str) -> Result<String, SyncError> {
        Ok(format!(
            "https://bookmarks.example.net/api/favicon/icon?domain={}&sz=32",
            domain
        ))
    }
}

fn print_tree(nodes: &[bookmark_mirror::HostNode], indent: usize) {
    for node in nodes {
        match &node.url {
            Some(url) => println!("{}• {} → {}", "  ".repeat(indent), node.title, url),
            None => println!("{}▸ {}/", "  ".repeat(indent), node.title),
        }
        print_tree(&node.children, indent + 1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           bookmark-mirror: Basic Usage Example                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Wire the engine
    // ─────────────────────────────────────────────────────────────────────────
    let store = Arc::new(InMemoryStore::new());
    let config = Arc::new(ConfigStore::new(store.clone()));
    let remote = Arc::new(DemoRemote);
    let host = Arc::new(InMemoryHostTree::new());

    let synchronizer = TreeSynchronizer::new(host.clone(), remote.clone());

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Resync the mirror
    // ─────────────────────────────────────────────────────────────────────────
    println!("🔄 Running resync...");
    let report = synchronizer.resync().await?;
    println!(
        "   deleted {} marker(s), created {} folders and {} bookmarks\n",
        report.deleted, report.folders, report.bookmarks
    );

    println!("📁 Host tree after resync:");
    print_tree(&host.list_root().await?, 1);

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Most-visited list, cache-first
    // ─────────────────────────────────────────────────────────────────────────
    let list = BookmarkListService::new(remote.clone(), BookmarkListCache::new(store.clone()));

    println!("\n⭐ Most visited (fetches and fills the cache):");
    for entry in list.most_visited(3).await? {
        println!("   {:>4} visits  {}", entry.num, entry.name);
    }
    println!("⭐ Narrower ask (served from the cache, no fetch):");
    for entry in list.most_visited(2).await? {
        println!("   {:>4} visits  {}", entry.num, entry.name);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Favicon resolution
    // ─────────────────────────────────────────────────────────────────────────
    let resolver = IconResolver::new(remote, config, IconCache::new(store));

    println!("\n🖼  Favicons:");
    for page in ["https://ci.example.net/", "not a url at all"] {
        println!("   {} → {}", page, resolver.resolve_cached(page).await);
    }

    println!("\n✅ Done");
    Ok(())
}
