//! Round configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a single fetch-and-save round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Maximum tasks running at once (0 = unlimited).
    /// When limited, the remaining reports wait for a free slot; the round
    /// still completes only after every report has been handled.
    #[serde(default)]
    pub max_concurrent_tasks: usize,

    /// Deadline for the fetch step of a task, in seconds (0 = none).
    /// An expired deadline is reported as a failed fetch.
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
}

fn default_task_timeout() -> u64 {
    300 // 5 minutes
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 0,
            task_timeout_secs: default_task_timeout(),
        }
    }
}

impl RoundConfig {
    /// Fetch deadline, if one is configured.
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.task_timeout_secs > 0).then(|| Duration::from_secs(self.task_timeout_secs))
    }

    /// Concurrency cap, if one is configured.
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_tasks > 0).then_some(self.max_concurrent_tasks)
    }
}
