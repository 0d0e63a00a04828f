//! Favicon resolution.
//!
//! [`IconResolver`] turns a page URL into something an `<img>` tag can
//! load, and it never fails: every internal error degrades to
//! [`DEFAULT_ICON`]. Source selection comes from configuration:
//!
//! - `google-s2` (default): return the public aggregator's URL template
//!   directly. No availability probe — if the aggregator is down the
//!   image load fails client-side, which costs the same round trip a
//!   probe would have.
//! - `self-hosted`: ask the bookmark server's favicon endpoint with
//!   credentials; any failure logs and falls back to the default icon.
//!
//! `resolve_cached`/`resolve_batch` layer the [`IconCache`] on top:
//! successful resolutions are written back, the default-icon fallback is
//! not, so a transient outage cannot pin the default for the cache TTL.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::cache::IconCache;
use crate::config::{ConfigStore, IconSource};
use crate::remote::RemoteDirectory;

/// Bundled fallback icon, served when resolution fails.
pub const DEFAULT_ICON: &str = "/icon48.png";

pub struct IconResolver {
    remote: Arc<dyn RemoteDirectory>,
    config: Arc<ConfigStore>,
    cache: IconCache,
}

impl IconResolver {
    pub fn new(remote: Arc<dyn RemoteDirectory>, config: Arc<ConfigStore>, cache: IconCache) -> Self {
        Self {
            remote,
            config,
            cache,
        }
    }

    /// Resolve a favicon URL for `page_url`. Infallible by contract.
    pub async fn resolve(&self, page_url: &str) -> String {
        let host = match Url::parse(page_url).ok().and_then(|u| {
            u.host_str().map(str::to_string)
        }) {
            Some(host) => host,
            None => {
                debug!(%page_url, "cannot extract host, using default icon");
                return DEFAULT_ICON.to_string();
            }
        };

        let config = self.config.get().await;
        match config.icon_source {
            IconSource::SelfHosted => match self.remote.favicon_url(&host).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(%host, error = %e, "self-hosted favicon lookup failed, using default icon");
                    DEFAULT_ICON.to_string()
                }
            },
            IconSource::GoogleS2 => aggregator_url(&host),
        }
    }

    /// Resolve through the icon cache: serve a cached mapping when one
    /// exists, otherwise resolve and remember the result.
    pub async fn resolve_cached(&self, page_url: &str) -> String {
        if let Some(hit) = self.cache.get_all().await.get(page_url) {
            return hit.clone();
        }

        let resolved = self.resolve(page_url).await;
        if resolved != DEFAULT_ICON {
            if let Err(e) = self.cache.put(page_url, &resolved).await {
                warn!(error = %e, "failed to cache resolved icon");
            }
        }
        resolved
    }

    /// Resolve a batch of page URLs against one cache snapshot, writing
    /// all fresh resolutions back in a single batch.
    pub async fn resolve_batch(&self, page_urls: &[String]) -> HashMap<String, String> {
        let cached = self.cache.get_all().await;
        let mut result = HashMap::with_capacity(page_urls.len());
        let mut fresh = HashMap::new();

        for page_url in page_urls {
            if let Some(hit) = cached.get(page_url) {
                result.insert(page_url.clone(), hit.clone());
                continue;
            }
            let resolved = self.resolve(page_url).await;
            if resolved != DEFAULT_ICON {
                fresh.insert(page_url.clone(), resolved.clone());
            }
            result.insert(page_url.clone(), resolved);
        }

        if let Err(e) = self.cache.put_batch(&fresh).await {
            warn!(error = %e, "failed to cache resolved icon batch");
        }
        result
    }
}

fn aggregator_url(host: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}&sz=32", host)
}
