//! Mock report fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::fetcher::{FetchError, ReportFetcher};
use crate::report::ReportSpec;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The report that was requested.
    pub report: ReportSpec,
    /// When the fetch started (tokio clock, so it follows paused time).
    pub started_at: Instant,
    /// When the fetch returned; `None` if it was cancelled or is still running.
    pub finished_at: Option<Instant>,
}

/// Scripted behavior for one report id.
#[derive(Debug, Clone)]
enum Scripted {
    Payload(Vec<u8>),
    Error(FetchError),
    Hang,
    Panic,
}

/// Decrements the in-flight counter even when the fetch future is dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock implementation of the ReportFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Scripted payloads or errors per report id
/// - Simulated latency, hangs and panics
/// - Recorded calls with start/finish times
/// - Peak number of concurrent fetches
///
/// Unscripted reports succeed with `{"report_id":<id>}`.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = MockReportFetcher::new();
/// fetcher.set_error(2, FetchError::Timeout).await;
///
/// let payload = fetcher.fetch(&ReportSpec::new(1, "alpha")).await?;
/// assert_eq!(fetcher.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockReportFetcher {
    /// Recorded fetch calls.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// Per-report scripted behavior.
    scripted: Arc<RwLock<HashMap<u64, Scripted>>>,
    /// Per-report latency.
    delays: Arc<RwLock<HashMap<u64, Duration>>>,
    /// Latency for reports without their own delay.
    default_delay: Arc<RwLock<Duration>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockReportFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `report_id` with `payload`.
    pub async fn set_payload(&self, report_id: u64, payload: Vec<u8>) {
        self.scripted
            .write()
            .await
            .insert(report_id, Scripted::Payload(payload));
    }

    /// Fail every fetch of `report_id` with `error`.
    pub async fn set_error(&self, report_id: u64, error: FetchError) {
        self.scripted
            .write()
            .await
            .insert(report_id, Scripted::Error(error));
    }

    /// Never complete fetches of `report_id`.
    pub async fn set_hang(&self, report_id: u64) {
        self.scripted.write().await.insert(report_id, Scripted::Hang);
    }

    /// Panic inside fetches of `report_id`.
    pub async fn set_panic(&self, report_id: u64) {
        self.scripted.write().await.insert(report_id, Scripted::Panic);
    }

    /// Go back to the default payload for `report_id`.
    pub async fn clear_script(&self, report_id: u64) {
        self.scripted.write().await.remove(&report_id);
    }

    /// Set the simulated latency for one report.
    pub async fn set_delay(&self, report_id: u64, delay: Duration) {
        self.delays.write().await.insert(report_id, delay);
    }

    /// Set the simulated latency for reports without their own delay.
    pub async fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches started.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Number of fetches started for one report.
    pub async fn fetch_count_for(&self, report_id: u64) -> usize {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|f| f.report.id == report_id)
            .count()
    }

    /// Fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn delay_for(&self, report_id: u64) -> Duration {
        match self.delays.read().await.get(&report_id) {
            Some(delay) => *delay,
            None => *self.default_delay.read().await,
        }
    }
}

#[async_trait]
impl ReportFetcher for MockReportFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, report: &ReportSpec) -> Result<Vec<u8>, FetchError> {
        let now_running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_running, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        let index = {
            let mut fetches = self.fetches.write().await;
            fetches.push(RecordedFetch {
                report: report.clone(),
                started_at: Instant::now(),
                finished_at: None,
            });
            fetches.len() - 1
        };

        let delay = self.delay_for(report.id).await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.scripted.read().await.get(&report.id).cloned();
        let result = match scripted {
            Some(Scripted::Payload(payload)) => Ok(payload),
            Some(Scripted::Error(error)) => Err(error),
            Some(Scripted::Hang) => std::future::pending().await,
            Some(Scripted::Panic) => panic!("simulated panic fetching report {}", report.id),
            None => Ok(format!(r#"{{"report_id":{}}}"#, report.id).into_bytes()),
        };

        if let Some(recorded) = self.fetches.write().await.get_mut(index) {
            recorded.finished_at = Some(Instant::now());
        }

        result
    }
}
