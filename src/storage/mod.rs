//! Key-value persistence for caches and configuration.
//!
//! Everything the engine persists (the bookmark-list cache slot, the icon
//! map, the connection config) is a JSON document under a fixed key, so the
//! storage seam is a plain key-value trait. Components take the store by
//! `Arc<dyn KeyValueStore>` at construction, which lets tests run against
//! [`InMemoryStore`] while production points at [`RedisStore`].

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Asynchronous JSON key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the document under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or overwrite the document under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the document under `key`. Removing an absent key is not an
    /// error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
