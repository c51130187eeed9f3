mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use axiom_query_core::{
    load_config, validate_config, ArtifactWriter, AxiomReportFetcher, AxiomSessionProvider,
    FsArtifactWriter, ReportFetcher, RoundObserver, RoundOrchestrator, RoundReport,
    SanitizedConfig, Scheduler, SessionProvider,
};

use cli::CliArgs;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(&args);

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr. `--log-level` wins over `RUST_LOG`; without either the
/// filter is `info`.
fn init_logging(args: &CliArgs) {
    let filter = match args.log_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: CliArgs) -> Result<()> {
    info!("axiom-query - version {}", VERSION);

    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        interval_minutes = config.interval,
        reports = config.reports.len(),
        reports_path = %config.reports_path.display(),
        "Configuration loaded successfully"
    );
    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    // Establish the service session once; every round reuses it.
    let provider = AxiomSessionProvider::new(config.service.clone())
        .context("Failed to create session provider")?;
    let session = provider
        .establish()
        .await
        .with_context(|| format!("Failed to establish {} session", provider.name()))?;

    let fetcher: Arc<dyn ReportFetcher> = Arc::new(AxiomReportFetcher::new(Arc::new(session)));

    let writer: Arc<dyn ArtifactWriter> = Arc::new(FsArtifactWriter::new(&config.reports_path));
    // Per-task write failures are reported per round, so an unusable
    // directory at startup is not fatal.
    if let Err(e) = writer.validate().await {
        warn!(error = %e, "Artifact directory is not usable yet");
    }

    let orchestrator = Arc::new(RoundOrchestrator::new(
        config.round.clone(),
        config.reports.clone(),
        fetcher,
        writer,
    ));

    let observer: RoundObserver = Arc::new(|report: &RoundReport| {
        debug!(
            "Round report: {}",
            serde_json::to_string(report).unwrap_or_default()
        );
    });

    let scheduler =
        Scheduler::new(orchestrator, config.interval_duration()).with_observer(observer);

    let rounds = scheduler.run_until(shutdown_signal()).await;

    info!(rounds, "Shutting down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
