// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::rate_store::RateStore;

/// Shortest period between scheduled refreshes, whatever the store TTL
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Background task refreshing a [`RateStore`] once per TTL.
///
/// Dropping the scheduler aborts the task; [`RefreshScheduler::shutdown`] stops it
/// and waits for it to finish.
pub struct RefreshScheduler {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Spawn the refresh loop. The first refresh runs immediately.
    pub fn start(store: Arc<RateStore>) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let period = store.ttl().max(MIN_REFRESH_PERIOD);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "Rate refresh scheduler started");

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        // Ticks are a full TTL apart, so skip the freshness check
                        let ok = store.force_refresh().await;
                        debug!(ok, "Scheduled rate refresh finished");
                    }
                }
            }

            info!("Rate refresh scheduler stopped");
        });

        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RateProvider;
    use crate::rate_store::tests::FakeProvider;
    use crate::rate_store::StoreState;

    fn store_with_ttl(provider: &Arc<FakeProvider>, ttl: Duration) -> Arc<RateStore> {
        Arc::new(
            RateStore::with_providers(vec![provider.clone() as Arc<dyn RateProvider>])
                .with_ttl(ttl),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_refreshes_periodically() {
        let provider = FakeProvider::ok(&[("INR", 85.0)]);
        let store = store_with_ttl(&provider, Duration::from_secs(60));

        let scheduler = RefreshScheduler::start(store.clone());
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert!(scheduler.is_running());
        scheduler.shutdown().await;

        // Ticks at 0s, 60s and 120s
        assert_eq!(provider.calls(), 3);
        assert_eq!(store.state(), StoreState::Warm);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_is_rate_limited() {
        let provider = FakeProvider::ok(&[("INR", 85.0)]);
        let store = store_with_ttl(&provider, Duration::ZERO);

        let scheduler = RefreshScheduler::start(store);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        scheduler.shutdown().await;

        // Ticks at 0s, 1s and 2s instead of one per millisecond
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_scheduler() {
        let provider = FakeProvider::ok(&[("INR", 85.0)]);
        let store = store_with_ttl(&provider, Duration::from_secs(10));

        let scheduler = RefreshScheduler::start(store);
        tokio::time::sleep(Duration::from_secs(15)).await;
        drop(scheduler);
        tokio::task::yield_now().await;

        let calls = provider.calls();
        assert_eq!(calls, 2);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(provider.calls(), calls);
    }
}
