//! Report fetching.
//!
//! A `ReportFetcher` performs exactly one request per call and hands back the
//! raw response body. It never retries; failures are returned to the round
//! task, which logs them and moves on.

mod axiom;
mod traits;
mod types;

pub use axiom::AxiomReportFetcher;
pub use traits::ReportFetcher;
pub use types::FetchError;
