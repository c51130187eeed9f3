//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "axiom-query",
    version,
    about = "Periodically download saved Axiom query results to disk.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(
        long,
        value_name = "PATH",
        env = "AXIOM_QUERY_CONFIG",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUST_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["axiom-query"]).unwrap();
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_explicit_flags() {
        let args = CliArgs::try_parse_from([
            "axiom-query",
            "--config",
            "/etc/axiom-query.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/axiom-query.toml"));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.log_level.unwrap().as_directive(), "debug");
    }

    #[test]
    fn test_rejects_unknown_level() {
        assert!(CliArgs::try_parse_from(["axiom-query", "--log-level", "loud"]).is_err());
    }
}
