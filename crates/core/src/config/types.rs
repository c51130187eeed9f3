use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::report::ReportSpec;
use crate::round::RoundConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Minutes between the start of consecutive rounds.
    pub interval: u64,
    /// Directory receiving one `<name>.json` artifact per report.
    pub reports_path: PathBuf,
    pub service: ServiceConfig,
    #[serde(default)]
    pub round: RoundConfig,
    /// Reports fetched every round, in configuration order.
    #[serde(default)]
    pub reports: Vec<ReportSpec>,
}

impl Config {
    /// Polling interval as a [`Duration`].
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval.saturating_mul(60))
    }
}

/// Remote reporting service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub username: String,
    pub password: String,
    /// School (tenant) identifier, used as the first path segment of every URL.
    pub school: String,
    /// Query service URL (e.g., "https://axiom.veracross.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Login portal URL (e.g., "https://accounts.veracross.com")
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
    /// HTTP client timeout in seconds (default: 60). Applies to every
    /// request, login included; must be non-zero.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://axiom.veracross.com".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.veracross.com".to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Sanitized config for startup logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub interval: u64,
    pub reports_path: PathBuf,
    pub service: SanitizedServiceConfig,
    pub round: RoundConfig,
    pub reports: Vec<ReportSpec>,
}

/// Sanitized service config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServiceConfig {
    pub username: String,
    pub password_configured: bool,
    pub school: String,
    pub base_url: String,
    pub accounts_url: String,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.interval,
            reports_path: config.reports_path.clone(),
            service: SanitizedServiceConfig {
                username: config.service.username.clone(),
                password_configured: !config.service.password.is_empty(),
                school: config.service.school.clone(),
                base_url: config.service.base_url.clone(),
                accounts_url: config.service.accounts_url.clone(),
                timeout_secs: config.service.timeout_secs,
            },
            round: config.round.clone(),
            reports: config.reports.clone(),
        }
    }
}
