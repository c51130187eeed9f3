//! Round lifecycle integration tests.
//!
//! These tests verify a full round through the public API:
//! fan-out -> fetch -> write -> join barrier -> round report

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use axiom_query_core::{
    testing::{MockArtifactWriter, MockReportFetcher},
    ArtifactWriter, FetchError, FsArtifactWriter, ReportFetcher, ReportSpec, RoundConfig,
    RoundOrchestrator, TaskOutcome,
};

/// Test helper wiring mocks into an orchestrator.
struct TestHarness {
    fetcher: Arc<MockReportFetcher>,
    writer: Arc<MockArtifactWriter>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            fetcher: Arc::new(MockReportFetcher::new()),
            writer: Arc::new(MockArtifactWriter::new()),
        }
    }

    fn create_orchestrator(&self, reports: Vec<ReportSpec>) -> RoundOrchestrator {
        RoundOrchestrator::new(
            RoundConfig::default(),
            reports,
            Arc::clone(&self.fetcher) as Arc<dyn ReportFetcher>,
            Arc::clone(&self.writer) as Arc<dyn ArtifactWriter>,
        )
    }
}

fn numbered_reports(count: u64) -> Vec<ReportSpec> {
    (1..=count)
        .map(|id| ReportSpec::new(id, format!("report-{}", id)))
        .collect()
}

// =============================================================================
// Join barrier
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_round_waits_for_slowest_task() {
    let harness = TestHarness::new();
    harness.fetcher.set_delay(3, Duration::from_secs(30)).await;
    let orchestrator = Arc::new(harness.create_orchestrator(numbered_reports(3)));

    let running = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.run_round().await })
    };

    // The two fast reports are done long before the slow one.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(harness.writer.write_count().await, 2);
    assert_eq!(harness.fetcher.in_flight(), 1);
    assert!(!running.is_finished());

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert!(running.is_finished());

    let report = running.await.unwrap();
    assert_eq!(report.tasks.len(), 3);
    assert_eq!(report.saved_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_round_waits_for_failed_and_slow_tasks_alike() {
    let harness = TestHarness::new();
    harness.fetcher.set_error(1, FetchError::Timeout).await;
    harness.fetcher.set_delay(2, Duration::from_secs(5)).await;
    harness.writer.fail_writes_for("report-2").await;
    let orchestrator = harness.create_orchestrator(numbered_reports(3));

    let report = orchestrator.run_round().await;

    // Every task reached a terminal state before the round returned.
    assert_eq!(report.tasks.len(), 3);
    assert!(matches!(
        report.outcome_for("report-1"),
        Some(TaskOutcome::FetchFailed { .. })
    ));
    assert!(matches!(
        report.outcome_for("report-2"),
        Some(TaskOutcome::WriteFailed { .. })
    ));
    assert!(report.outcome_for("report-3").unwrap().is_saved());
    assert_eq!(harness.fetcher.in_flight(), 0);
}

// =============================================================================
// Isolation
// =============================================================================

#[tokio::test]
async fn test_single_fetch_failure_does_not_affect_siblings() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_error(
            4,
            FetchError::Status {
                status: 502,
                message: "Bad Gateway".to_string(),
            },
        )
        .await;
    let orchestrator = harness.create_orchestrator(numbered_reports(8));

    let report = orchestrator.run_round().await;

    assert_eq!(report.saved_count(), 7);
    assert_eq!(report.failed_count(), 1);
    assert!(harness.writer.artifact("report-4").await.is_none());
    for id in [1, 2, 3, 5, 6, 7, 8] {
        assert!(harness
            .writer
            .artifact(&format!("report-{}", id))
            .await
            .is_some());
    }
}

#[tokio::test]
async fn test_every_task_failing_still_completes_round() {
    let harness = TestHarness::new();
    for id in 1..=3 {
        harness
            .fetcher
            .set_error(id, FetchError::ConnectionFailed("refused".to_string()))
            .await;
    }
    let orchestrator = harness.create_orchestrator(numbered_reports(3));

    let report = orchestrator.run_round().await;
    assert_eq!(report.failed_count(), 3);
    assert_eq!(harness.writer.write_count().await, 0);

    // The next round is unaffected by the previous failures.
    for id in 1..=3 {
        harness.fetcher.clear_script(id).await;
    }
    let report = orchestrator.run_round().await;
    assert_eq!(report.round, 2);
    assert_eq!(report.saved_count(), 3);
}

// =============================================================================
// Fan-out completeness
// =============================================================================

#[tokio::test]
async fn test_exactly_one_fetch_per_report_per_round() {
    let harness = TestHarness::new();
    harness.fetcher.set_error(2, FetchError::Timeout).await;
    let orchestrator = harness.create_orchestrator(numbered_reports(5));

    orchestrator.run_round().await;
    orchestrator.run_round().await;

    assert_eq!(harness.fetcher.fetch_count().await, 10);
    for id in 1..=5 {
        assert_eq!(harness.fetcher.fetch_count_for(id).await, 2);
    }
    // Writes only for fetched payloads.
    assert_eq!(harness.writer.write_count().await, 8);
}

#[tokio::test(start_paused = true)]
async fn test_reports_are_fetched_concurrently() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_default_delay(Duration::from_secs(10))
        .await;
    let orchestrator = harness.create_orchestrator(numbered_reports(4));

    let started = tokio::time::Instant::now();
    orchestrator.run_round().await;

    // Four 10s fetches in parallel take 10s, not 40s.
    assert!(started.elapsed() < Duration::from_secs(11));
    assert_eq!(harness.fetcher.peak_in_flight(), 4);
}

// =============================================================================
// Storage
// =============================================================================

#[tokio::test]
async fn test_second_round_replaces_artifact_content() {
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(MockReportFetcher::new());
    let writer = Arc::new(FsArtifactWriter::new(temp.path()));
    let orchestrator = RoundOrchestrator::new(
        RoundConfig::default(),
        vec![ReportSpec::new(1, "alpha")],
        Arc::clone(&fetcher) as Arc<dyn ReportFetcher>,
        writer as Arc<dyn ArtifactWriter>,
    );

    fetcher
        .set_payload(1, br#"{"rows":[1,2,3,4,5,6,7,8,9]}"#.to_vec())
        .await;
    orchestrator.run_round().await;

    fetcher.set_payload(1, br#"{"rows":[]}"#.to_vec()).await;
    let report = orchestrator.run_round().await;

    let path = temp.path().join("alpha.json");
    match report.outcome_for("alpha") {
        Some(TaskOutcome::Saved {
            path: saved_path,
            size_bytes,
            ..
        }) => {
            assert_eq!(saved_path, &path);
            assert_eq!(*size_bytes, 11);
        }
        other => panic!("expected saved outcome, got {:?}", other),
    }
    assert_eq!(std::fs::read(&path).unwrap(), br#"{"rows":[]}"#.to_vec());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_artifact() {
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(MockReportFetcher::new());
    let orchestrator = RoundOrchestrator::new(
        RoundConfig::default(),
        vec![ReportSpec::new(1, "alpha")],
        Arc::clone(&fetcher) as Arc<dyn ReportFetcher>,
        Arc::new(FsArtifactWriter::new(temp.path())) as Arc<dyn ArtifactWriter>,
    );

    fetcher.set_payload(1, b"good".to_vec()).await;
    orchestrator.run_round().await;

    fetcher
        .set_error(
            1,
            FetchError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            },
        )
        .await;
    orchestrator.run_round().await;

    assert_eq!(
        std::fs::read(temp.path().join("alpha.json")).unwrap(),
        b"good".to_vec()
    );
}
