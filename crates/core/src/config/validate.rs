use std::collections::HashSet;

use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Interval is not 0
/// - Service credentials and school are present, URLs parse
/// - Service timeout is not 0
/// - At least one report is configured
/// - Artifact names are unique and usable as file names
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.interval == 0 {
        return Err(ConfigError::ValidationError(
            "interval cannot be 0".to_string(),
        ));
    }

    // Service validation
    if config.service.username.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "service.username cannot be empty".to_string(),
        ));
    }
    if config.service.school.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "service.school cannot be empty".to_string(),
        ));
    }
    for (key, value) in [
        ("service.base_url", &config.service.base_url),
        ("service.accounts_url", &config.service.accounts_url),
    ] {
        Url::parse(value).map_err(|e| {
            ConfigError::ValidationError(format!("{} is not a valid URL ({}): {}", key, value, e))
        })?;
    }
    if config.service.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "service.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Report validation
    if config.reports.is_empty() {
        return Err(ConfigError::ValidationError(
            "no reports configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for report in &config.reports {
        validate_artifact_name(&report.name)?;
        if !seen.insert(report.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate report name '{}'",
                report.name
            )));
        }
    }

    Ok(())
}

/// Names become `<reports_path>/<name>.json`, so they must stay inside the directory.
fn validate_artifact_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "report name cannot be empty".to_string(),
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(ConfigError::ValidationError(format!(
            "report name '{}' is not a valid file name",
            name
        )));
    }
    Ok(())
}
