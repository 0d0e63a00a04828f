//! Connection settings and their persistence.
//!
//! # Example
//!
//! ```
//! use bookmark_mirror::{IconSource, SyncConfig};
//!
//! // Minimal config (uses defaults)
//! let config = SyncConfig::default();
//! assert_eq!(config.sync_interval_minutes, 30);
//! assert_eq!(config.icon_source, IconSource::GoogleS2);
//!
//! // Full config
//! let config = SyncConfig {
//!     server_url: "https://bookmarks.example.net/api".into(),
//!     api_key: "k-123".into(),
//!     auto_sync: true,
//!     ..Default::default()
//! };
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStore, StoreError};

/// Storage key the config document lives under.
pub const CONFIG_KEY: &str = "config";

/// Which service favicon URLs are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconSource {
    /// Public favicon aggregator (URL template, no round trip).
    #[default]
    GoogleS2,
    /// The bookmark server's own favicon endpoint (credentials attached).
    SelfHosted,
}

/// Connection settings for the remote bookmark directory.
///
/// All fields have defaults, so a partially-stored document (older
/// versions, hand-edited) still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the bookmark server API
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Access key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Whether the background scheduler resyncs on its own
    #[serde(default)]
    pub auto_sync: bool,

    /// Minutes between scheduled resyncs
    #[serde(default = "default_sync_interval_minutes")]
    pub sync_interval_minutes: u64,

    /// Favicon source selection
    #[serde(default)]
    pub icon_source: IconSource,

    /// Epoch millis of the last successful resync
    #[serde(default)]
    pub last_sync_time: Option<u64>,
}

fn default_server_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_sync_interval_minutes() -> u64 {
    30
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api_key: String::new(),
            auto_sync: false,
            sync_interval_minutes: default_sync_interval_minutes(),
            icon_source: IconSource::default(),
            last_sync_time: None,
        }
    }
}

/// Persists [`SyncConfig`] under [`CONFIG_KEY`] in an injected store.
///
/// Reads degrade to defaults: a missing or unparseable document yields
/// `SyncConfig::default()` rather than an error, so a corrupt config can
/// never brick the engine.
pub struct ConfigStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the current config, falling back to defaults.
    pub async fn get(&self) -> SyncConfig {
        match self.store.get(CONFIG_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "stored config is malformed, using defaults");
                    SyncConfig::default()
                }
            },
            Ok(None) => SyncConfig::default(),
            Err(e) => {
                warn!(error = %e, "failed to read config, using defaults");
                SyncConfig::default()
            }
        }
    }

    /// Overwrite the stored config.
    pub async fn set(&self, config: &SyncConfig) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(config).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(CONFIG_KEY, value).await
    }

    /// Read-modify-write a subset of fields.
    pub async fn update<F>(&self, apply: F) -> Result<SyncConfig, StoreError>
    where
        F: FnOnce(&mut SyncConfig),
    {
        let mut config = self.get().await;
        apply(&mut config);
        self.set(&config).await?;
        Ok(config)
    }

    /// Stamp `last_sync_time` with the current time.
    pub async fn update_last_sync_time(&self) -> Result<(), StoreError> {
        let now = epoch_millis();
        self.update(|config| config.last_sync_time = Some(now))
            .await?;
        Ok(())
    }

    /// Remove the stored config entirely.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CONFIG_KEY).await
    }
}

fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
