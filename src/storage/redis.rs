// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Redis key-value backend.
//!
//! Documents are stored as plain JSON strings under their key, optionally
//! namespaced with a prefix so the mirror can share a Redis instance with
//! other applications:
//!
//! ```text
//! SET  bm:icon_cache       '{"icons":{...}}'
//! SET  bm:bookmarks_cache  '{"bookmarks":[...],"timestamp":...,"limit":20}'
//! ```

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value;

use super::{KeyValueStore, StoreError};

pub struct RedisStore {
    connection: ConnectionManager,
    /// Optional key prefix for namespacing (e.g., "bm:" → "bm:icon_cache")
    prefix: String,
}

impl RedisStore {
    /// Create a new Redis store without a key prefix.
    pub async fn new(connection_string: &str) -> Result<Self, StoreError> {
        Self::with_prefix(connection_string, None).await
    }

    /// Create a new Redis store with an optional key prefix.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use bookmark_mirror::storage::RedisStore;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// // Keys will be prefixed: "bm:config", "bm:icon_cache"
    /// let store = RedisStore::with_prefix("redis://localhost", Some("bm:")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_prefix(
        connection_string: &str,
        prefix: Option<&str>,
    ) -> Result<Self, StoreError> {
        let client =
            Client::open(connection_string).map_err(|e| StoreError::Backend(e.to_string()))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            connection,
            prefix: prefix.unwrap_or("").to_string(),
        })
    }

    /// Apply the prefix to a key.
    #[inline]
    fn prefixed_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}", self.prefix, key)
        }
    }

    /// Get the configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(self.prefixed_key(key))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match raw {
            Some(text) => {
                let value = serde_json::from_str(&text)
                    .map_err(|e| StoreError::Serialize(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let text =
            serde_json::to_string(&value).map_err(|e| StoreError::Serialize(e.to_string()))?;

        let mut conn = self.connection.clone();
        let _: () = conn
            .set(self.prefixed_key(key), text)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(self.prefixed_key(key))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
