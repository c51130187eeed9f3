//! Round orchestrator implementation.
//!
//! Every report gets its own spawned task running fetch then write. The
//! round joins all of them before returning, whatever their outcomes, and a
//! failing or panicking task never touches its siblings.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::fetcher::{FetchError, ReportFetcher};
use crate::report::ReportSpec;
use crate::writer::ArtifactWriter;

use super::config::RoundConfig;
use super::types::{RoundReport, TaskOutcome, TaskReport};

/// Runs rounds over a fixed list of reports.
pub struct RoundOrchestrator {
    config: RoundConfig,
    reports: Arc<[ReportSpec]>,
    fetcher: Arc<dyn ReportFetcher>,
    writer: Arc<dyn ArtifactWriter>,
    /// Shared by every round when a concurrency cap is configured.
    slots: Option<Arc<Semaphore>>,
    rounds_started: AtomicU64,
}

impl RoundOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: RoundConfig,
        reports: Vec<ReportSpec>,
        fetcher: Arc<dyn ReportFetcher>,
        writer: Arc<dyn ArtifactWriter>,
    ) -> Self {
        let slots = config
            .concurrency_limit()
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            config,
            reports: reports.into(),
            fetcher,
            writer,
            slots,
            rounds_started: AtomicU64::new(0),
        }
    }

    /// Reports handled by every round, in configuration order.
    pub fn reports(&self) -> &[ReportSpec] {
        &self.reports
    }

    /// Run one round and wait for every task in it to finish.
    pub async fn run_round(&self) -> RoundReport {
        let round = self.rounds_started.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Utc::now();

        info!(
            round,
            reports = self.reports.len(),
            fetcher = self.fetcher.name(),
            writer = self.writer.name(),
            "Starting round"
        );

        let mut tasks = JoinSet::new();
        let mut index_by_task = HashMap::with_capacity(self.reports.len());

        for (idx, report) in self.reports.iter().enumerate() {
            let report = report.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let writer = Arc::clone(&self.writer);
            let slots = self.slots.clone();
            let deadline = self.config.task_timeout();
            // Set once the task holds its slot; a crashed task is timed from here.
            let running_since = Arc::new(OnceLock::new());
            let task_running_since = Arc::clone(&running_since);

            let handle = tasks.spawn(async move {
                // Held until the task is terminal; released on drop.
                let _slot = match slots {
                    Some(slots) => slots.acquire_owned().await.ok(),
                    None => None,
                };
                let _ = task_running_since.set(Instant::now());
                run_task(round, report, fetcher.as_ref(), writer.as_ref(), deadline).await
            });
            index_by_task.insert(handle.id(), (idx, running_since));
        }

        let mut finished: Vec<Option<TaskReport>> = vec![None; self.reports.len()];

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, task_report)) => {
                    if let Some((idx, _)) = index_by_task.get(&id) {
                        finished[*idx] = Some(task_report);
                    }
                }
                Err(join_error) => {
                    let Some((idx, running_since)) = index_by_task.get(&join_error.id()) else {
                        continue;
                    };
                    let idx = *idx;
                    let duration_ms = running_since
                        .get()
                        .map(|since| since.elapsed().as_millis() as u64)
                        .unwrap_or(0);
                    let report = self.reports[idx].clone();
                    error!(
                        round,
                        report_id = report.id,
                        name = %report.name,
                        error = %join_error,
                        "Report task crashed"
                    );
                    finished[idx] = Some(TaskReport {
                        report,
                        outcome: TaskOutcome::Crashed {
                            reason: join_error.to_string(),
                        },
                        duration_ms,
                    });
                }
            }
        }

        let tasks: Vec<TaskReport> = finished.into_iter().flatten().collect();
        let report = RoundReport {
            round,
            started_at,
            finished_at: Utc::now(),
            tasks,
        };

        info!(
            round,
            saved = report.saved_count(),
            failed = report.failed_count(),
            duration_ms = report.duration_ms(),
            "Round complete"
        );

        report
    }
}

/// Fetch one report and, if that worked, write it. Never returns an error:
/// every failure ends up in the outcome.
async fn run_task(
    round: u64,
    report: ReportSpec,
    fetcher: &dyn ReportFetcher,
    writer: &dyn ArtifactWriter,
    deadline: Option<Duration>,
) -> TaskReport {
    let start = Instant::now();
    debug!(round, report_id = report.id, name = %report.name, "Fetching report");

    let fetched = match deadline {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(&report))
            .await
            .unwrap_or(Err(FetchError::DeadlineExceeded(limit))),
        None => fetcher.fetch(&report).await,
    };

    let outcome = match fetched {
        Err(e) => {
            warn!(
                round,
                report_id = report.id,
                name = %report.name,
                error = %e,
                "Report fetch failed"
            );
            TaskOutcome::FetchFailed {
                reason: e.to_string(),
            }
        }
        Ok(payload) => {
            debug!(
                round,
                report_id = report.id,
                name = %report.name,
                bytes = payload.len(),
                "Report fetched, writing artifact"
            );
            match writer.write(&report.name, &payload).await {
                Ok(saved) => {
                    info!(
                        round,
                        report_id = report.id,
                        name = %report.name,
                        path = %saved.path.display(),
                        bytes = saved.size_bytes,
                        "Report saved"
                    );
                    TaskOutcome::Saved {
                        path: saved.path,
                        size_bytes: saved.size_bytes,
                        checksum: saved.checksum,
                    }
                }
                Err(e) => {
                    warn!(
                        round,
                        report_id = report.id,
                        name = %report.name,
                        error = %e,
                        "Report write failed"
                    );
                    TaskOutcome::WriteFailed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        round,
        report_id = report.id,
        name = %report.name,
        outcome = outcome.as_str(),
        duration_ms,
        "Task finished"
    );

    TaskReport {
        report,
        outcome,
        duration_ms,
    }
}
