//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the fetcher and writer
//! traits, allowing rounds and schedules to be exercised without a network
//! or a disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use axiom_query_core::testing::{MockArtifactWriter, MockReportFetcher};
//!
//! let fetcher = MockReportFetcher::new();
//! let writer = MockArtifactWriter::new();
//!
//! // Configure mock responses
//! fetcher.set_payload(1, br#"{"x":1}"#.to_vec()).await;
//! writer.fail_writes_for("beta").await;
//! ```

mod mock_fetcher;
mod mock_writer;

pub use mock_fetcher::{MockReportFetcher, RecordedFetch};
pub use mock_writer::{MockArtifactWriter, RecordedWrite};
