//! Veracross Axiom report fetcher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::report::ReportSpec;
use crate::session::{Session, CSRF_HEADER};

use super::{FetchError, ReportFetcher};

/// Longest slice of an error body kept in a [`FetchError::Status`].
const ERROR_BODY_PREVIEW: usize = 100;

/// Fetches saved-query results through an authenticated [`Session`].
pub struct AxiomReportFetcher {
    session: Arc<Session>,
}

impl AxiomReportFetcher {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl ReportFetcher for AxiomReportFetcher {
    fn name(&self) -> &str {
        "axiom"
    }

    async fn fetch(&self, report: &ReportSpec) -> Result<Vec<u8>, FetchError> {
        let url = self.session.report_url(report.id);
        debug!(report_id = report.id, url = %url, "Requesting report");

        let response = self
            .session
            .client()
            .post(&url)
            .header(CSRF_HEADER, self.session.token())
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no reason").to_string()
            } else {
                body.chars().take(ERROR_BODY_PREVIEW).collect()
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}
