//! Types for report fetching.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Request(String),

    /// The task deadline elapsed before the fetch finished.
    #[error("Fetch did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl FetchError {
    /// Maps a transport error the same way for sending and body reads.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::ConnectionFailed(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = FetchError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");

        let err = FetchError::DeadlineExceeded(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Fetch did not finish within 5s");
    }
}
