//! Types for round execution.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::ReportSpec;

/// Terminal state of one task.
///
/// A task moves `Pending -> Fetching -> Fetched -> Writing -> Saved`, and can
/// stop early in `FetchFailed` or `WriteFailed`. Nothing moves backwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Payload fetched and written.
    Saved {
        path: PathBuf,
        size_bytes: u64,
        checksum: String,
    },
    /// Request, status, body read or deadline failed; nothing was written.
    FetchFailed { reason: String },
    /// Payload fetched but the artifact could not be written.
    WriteFailed { reason: String },
    /// The task panicked; its sibling tasks are unaffected.
    Crashed { reason: String },
}

impl TaskOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, TaskOutcome::Saved { .. })
    }

    /// Returns the string representation for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOutcome::Saved { .. } => "saved",
            TaskOutcome::FetchFailed { .. } => "fetch_failed",
            TaskOutcome::WriteFailed { .. } => "write_failed",
            TaskOutcome::Crashed { .. } => "crashed",
        }
    }
}

/// Result of one report's task within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub report: ReportSpec,
    pub outcome: TaskOutcome,
    /// Wall time from task start to terminal state.
    pub duration_ms: u64,
}

/// Everything that happened in one round, in configuration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based round counter.
    pub round: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tasks: Vec<TaskReport>,
}

impl RoundReport {
    pub fn saved_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.outcome.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.tasks.len() - self.saved_count()
    }

    /// Outcome for the report saved under `name`, if it ran this round.
    pub fn outcome_for(&self, name: &str) -> Option<&TaskOutcome> {
        self.tasks
            .iter()
            .find(|t| t.report.name == name)
            .map(|t| &t.outcome)
    }

    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, outcome: TaskOutcome) -> TaskReport {
        TaskReport {
            report: ReportSpec::new(1, name),
            outcome,
            duration_ms: 10,
        }
    }

    #[test]
    fn test_counts() {
        let now = Utc::now();
        let report = RoundReport {
            round: 1,
            started_at: now,
            finished_at: now,
            tasks: vec![
                task(
                    "alpha",
                    TaskOutcome::Saved {
                        path: PathBuf::from("/r/alpha.json"),
                        size_bytes: 7,
                        checksum: "abc".to_string(),
                    },
                ),
                task(
                    "beta",
                    TaskOutcome::FetchFailed {
                        reason: "HTTP 500".to_string(),
                    },
                ),
            ],
        };

        assert_eq!(report.saved_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.outcome_for("beta").unwrap().as_str(), "fetch_failed");
        assert!(report.outcome_for("gamma").is_none());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = TaskOutcome::WriteFailed {
            reason: "disk full".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "write_failed");
        assert_eq!(json["reason"], "disk full");
    }
}
