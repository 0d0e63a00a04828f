//! Background resync scheduling.
//!
//! A single tokio task sleeps for the configured interval, then resyncs
//! if `auto_sync` is enabled. Both the interval and the enable flag are
//! re-read from the [`ConfigStore`] every cycle, so a settings change
//! takes effect at the next tick without restarting the task. After a
//! successful resync the last-sync marker is persisted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::TreeSynchronizer;
use crate::config::ConfigStore;
use crate::error::SyncError;

pub struct SyncScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    /// Spawn the scheduler with the interval taken from config
    /// (`sync_interval_minutes`).
    pub fn spawn(synchronizer: Arc<TreeSynchronizer>, config: Arc<ConfigStore>) -> Self {
        Self::spawn_inner(synchronizer, config, None)
    }

    /// Spawn with a fixed period, ignoring the configured interval.
    /// Tests use millisecond periods; production wants [`spawn`](Self::spawn).
    pub fn spawn_with_period(
        synchronizer: Arc<TreeSynchronizer>,
        config: Arc<ConfigStore>,
        period: Duration,
    ) -> Self {
        Self::spawn_inner(synchronizer, config, Some(period))
    }

    fn spawn_inner(
        synchronizer: Arc<TreeSynchronizer>,
        config: Arc<ConfigStore>,
        period: Option<Duration>,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!("sync scheduler started");
            loop {
                let sleep_for = match period {
                    Some(period) => period,
                    None => {
                        let minutes = config.get().await.sync_interval_minutes.max(1);
                        Duration::from_secs(minutes * 60)
                    }
                };

                tokio::select! {
                    _ = tokio::time::sleep(sleep_for) => {}
                    _ = shutdown_rx.changed() => {
                        info!("sync scheduler stopping");
                        break;
                    }
                }

                if !config.get().await.auto_sync {
                    debug!("auto-sync disabled, skipping scheduled resync");
                    continue;
                }

                match synchronizer.resync().await {
                    Ok(report) => {
                        info!(
                            deleted = report.deleted,
                            folders = report.folders,
                            bookmarks = report.bookmarks,
                            "scheduled resync finished"
                        );
                        if let Err(e) = config.update_last_sync_time().await {
                            warn!(error = %e, "failed to persist last sync time");
                        }
                    }
                    // A manual sync is running; this tick's work is
                    // already being done.
                    Err(SyncError::SyncInFlight) => {
                        debug!("resync already in flight, skipping tick");
                    }
                    Err(e) => {
                        warn!(error = %e, "scheduled resync failed");
                    }
                }
            }
        });

        Self { shutdown, handle }
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
