//! Recurring, non-overlapping rounds.
//!
//! The first round starts immediately. After each round completes the
//! scheduler waits for the next interval boundary; if the round overran the
//! interval the next one starts right away, and overdue pulses are skipped
//! rather than queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::round::{RoundOrchestrator, RoundReport};

/// Called with every completed round, on the scheduler's task.
pub type RoundObserver = Arc<dyn Fn(&RoundReport) + Send + Sync>;

/// Drives a [`RoundOrchestrator`] on a fixed interval.
pub struct Scheduler {
    orchestrator: Arc<RoundOrchestrator>,
    interval: Duration,
    observer: Option<RoundObserver>,
}

impl Scheduler {
    /// Create a new scheduler.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero; configuration validation rejects that
    /// before a scheduler is ever built.
    pub fn new(orchestrator: Arc<RoundOrchestrator>, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "scheduler interval must be non-zero");
        Self {
            orchestrator,
            interval,
            observer: None,
        }
    }

    /// Hand every completed [`RoundReport`] to `observer`.
    pub fn with_observer(mut self, observer: RoundObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run rounds until `stop` resolves. Stopping drops the in-flight round
    /// (its tasks are aborted) without waiting for it.
    ///
    /// Returns the number of rounds that completed.
    pub async fn run_until<S>(&self, stop: S) -> u64
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(stop);

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.interval.as_secs(),
            reports = self.orchestrator.reports().len(),
            "Scheduler started"
        );

        let mut completed = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = ticker.tick() => {}
            }

            let report = tokio::select! {
                biased;
                _ = &mut stop => break,
                report = self.orchestrator.run_round() => report,
            };
            completed += 1;

            if let Some(observer) = &self.observer {
                observer(&report);
            }
        }

        info!(rounds = completed, "Scheduler stopped");
        completed
    }
}
