//! Veracross Axiom session provider.

use std::time::Duration;

use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::ServiceConfig;

use super::{Session, SessionError, SessionProvider};

/// Logs in through the accounts portal and scrapes the CSRF token from the
/// school's landing page.
pub struct AxiomSessionProvider {
    client: Client,
    config: ServiceConfig,
    token_pattern: Regex,
}

impl AxiomSessionProvider {
    /// Create a new provider. The HTTP client built here is the one the
    /// resulting [`Session`] uses for every report request.
    pub fn new(config: ServiceConfig) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| SessionError::Client(e.to_string()))?;

        let token_pattern = Regex::new(r#"<meta\s+name="csrf-token"\s+content="([^"]+)""#)
            .map_err(|e| SessionError::Client(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token_pattern,
        })
    }

    fn school_segment(&self) -> String {
        urlencoding::encode(&self.config.school).into_owned()
    }

    fn login_url(&self) -> String {
        format!(
            "{}/{}/portals/login/password",
            self.config.accounts_url.trim_end_matches('/'),
            self.school_segment()
        )
    }

    fn school_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.school_segment()
        )
    }

    /// Post credentials; the session cookie lands in the client's jar.
    async fn login(&self) -> Result<(), SessionError> {
        let url = self.login_url();
        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::AuthenticationFailed(format!(
                "login rejected with HTTP {}",
                status
            )));
        }

        debug!(school = %self.config.school, "Axiom login accepted");
        Ok(())
    }

    /// Fetch the landing page and pull the CSRF token out of its meta tags.
    async fn fetch_token(&self) -> Result<String, SessionError> {
        let url = self.school_url();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::AuthenticationFailed(format!(
                "landing page returned HTTP {}",
                status
            )));
        }

        let body = response.text().await?;
        extract_token(&self.token_pattern, &body).ok_or(SessionError::TokenNotFound(url))
    }
}

fn extract_token(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl SessionProvider for AxiomSessionProvider {
    fn name(&self) -> &str {
        "axiom"
    }

    async fn establish(&self) -> Result<Session, SessionError> {
        self.login().await?;
        let token = self.fetch_token().await?;

        info!(
            school = %self.config.school,
            user = %self.config.username,
            "Axiom session established"
        );
        Ok(Session::new(self.client.clone(), token, self.school_url()))
    }
}
