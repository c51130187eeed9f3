//! Types for session establishment.

use std::fmt;

use reqwest::Client;
use thiserror::Error;

/// Header carrying the CSRF token on authorized requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Errors that can occur while establishing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("CSRF token not found in {0}")]
    TokenNotFound(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error: {0}")]
    ApiError(String),
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SessionError::Timeout
        } else if e.is_connect() {
            SessionError::ConnectionFailed(e.to_string())
        } else {
            SessionError::ApiError(e.to_string())
        }
    }
}

/// An authenticated handle on the query service.
///
/// Cloning is cheap: the inner client shares its connection pool and cookie jar.
#[derive(Clone)]
pub struct Session {
    client: Client,
    token: String,
    /// `<base_url>/<school>` without trailing slash.
    school_url: String,
}

impl Session {
    pub fn new(client: Client, token: impl Into<String>, school_url: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            school_url: school_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// HTTP client carrying the session cookies.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// CSRF token for the `x-csrf-token` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// URL returning the result data of a saved query.
    pub fn report_url(&self, report_id: u64) -> String {
        format!("{}/query/{}/result_data.json", self.school_url, report_id)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("school_url", &self.school_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_url() {
        let session = Session::new(Client::new(), "tok", "https://axiom.veracross.com/whitby/");
        assert_eq!(
            session.report_url(1234),
            "https://axiom.veracross.com/whitby/query/1234/result_data.json"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new(Client::new(), "very-secret", "http://localhost/school");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
