// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! HTTP implementation of [`RemoteDirectory`].
//!
//! Connection settings are read from the [`ConfigStore`] on every request,
//! so a saved settings change takes effect without rebuilding the client.
//! The access key travels in the `X-Access-Key` header.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{ApiEnvelope, NewBookmark, RemoteBookmark, RemoteTreeNode};
use super::RemoteDirectory;
use crate::config::ConfigStore;
use crate::error::SyncError;

/// Bound on every request, including the favicon probe.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpRemoteDirectory {
    client: Client,
    config: Arc<ConfigStore>,
}

impl HttpRemoteDirectory {
    pub fn new(config: Arc<ConfigStore>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Join the configured base URL with an endpoint path.
    async fn endpoint(&self, path: &str) -> (String, String) {
        let config = self.config.get().await;
        let base = config.server_url.trim_end_matches('/').to_string();
        (format!("{}{}", base, path), config.api_key)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SyncError> {
        let (url, api_key) = self.endpoint(path).await;
        debug!(%url, "remote GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("X-Access-Key", &api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait]
impl RemoteDirectory for HttpRemoteDirectory {
    async fn fetch_tree(&self, romanize: bool) -> Result<Vec<RemoteTreeNode>, SyncError> {
        self.get_json("/bookmark", &[("pinyin", romanize.to_string())])
            .await
    }

    async fn most_visited(
        &self,
        limit: usize,
        search: Option<&str>,
    ) -> Result<Vec<RemoteBookmark>, SyncError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(term) = search {
            query.push(("search", term.to_string()));
        }
        self.get_json("/most-visited", &query).await
    }

    async fn search(&self, query: Option<&str>) -> Result<Vec<RemoteBookmark>, SyncError> {
        let params: Vec<(&str, String)> = match query {
            Some(term) => vec![("search", term.to_string())],
            None => vec![],
        };
        self.get_json("/bookmarks", &params).await
    }

    async fn add_bookmark(&self, bookmark: &NewBookmark) -> Result<RemoteBookmark, SyncError> {
        let (url, api_key) = self.endpoint("/bookmark").await;
        debug!(%url, name = %bookmark.name, "remote POST");

        let response = self
            .client
            .post(&url)
            .header("X-Access-Key", &api_key)
            .json(bookmark)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let envelope: ApiEnvelope<RemoteBookmark> = response.json().await?;
        envelope.into_result()
    }

    async fn increment_usage(&self, id: &str) -> Result<(), SyncError> {
        let _: String = self
            .get_json("/increment-usage", &[("id", id.to_string())])
            .await?;
        Ok(())
    }

    async fn favicon_url(&self, domain: &str) -> Result<String, SyncError> {
        let (url, api_key) = self.endpoint("/favicon/icon").await;
        let full = format!("{}?domain={}&sz=32", url, domain);

        // The endpoint serves the image itself; a successful status means
        // the URL is usable as an <img> source, so the URL is the result.
        let response = self
            .client
            .get(&full)
            .header("X-Access-Key", &api_key)
            .header("Authorization", &api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Network(format!(
                "favicon endpoint returned HTTP {}",
                response.status()
            )));
        }

        Ok(full)
    }
}
