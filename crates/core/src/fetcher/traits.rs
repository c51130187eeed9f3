//! Trait definitions for the fetcher module.

use async_trait::async_trait;

use crate::report::ReportSpec;

use super::types::FetchError;

/// Retrieves the raw payload of one report.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Issues a single request for `report` and returns the response body.
    async fn fetch(&self, report: &ReportSpec) -> Result<Vec<u8>, FetchError>;
}
