//! Round orchestration: one concurrent fetch-and-save task per report, joined
//! before the round counts as complete.

mod config;
mod runner;
mod types;

pub use config::RoundConfig;
pub use runner::RoundOrchestrator;
pub use types::{RoundReport, TaskOutcome, TaskReport};
