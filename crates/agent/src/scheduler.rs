//! Fixed-interval poll loop.
//!
//! The first cycle runs immediately at startup, then one per interval until
//! the [`CancellationToken`] is cancelled. Each cycle is awaited inline, so
//! two cycles never run at once. If a cycle overruns the interval, the
//! missed ticks are skipped rather than fired back to back.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Drive `cycle` until cancelled. Returns the number of cycles started.
    ///
    /// Cancellation is checked between cycles and while waiting for the
    /// next tick; an in-flight cycle is allowed to finish.
    pub async fn run<F, Fut>(&self, cancel: CancellationToken, mut cycle: F) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Scheduler started, running first check now",
        );

        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(cycles, "Scheduler cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    cycles += 1;
                    tracing::debug!(cycle = cycles, "Poll cycle starting");
                    cycle().await;
                }
            }
        }

        cycles
    }
}
