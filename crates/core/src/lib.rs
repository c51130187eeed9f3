pub mod config;
pub mod fetcher;
pub mod report;
pub mod round;
pub mod scheduler;
pub mod session;
pub mod testing;
pub mod writer;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServiceConfig,
};
pub use fetcher::{AxiomReportFetcher, FetchError, ReportFetcher};
pub use report::ReportSpec;
pub use round::{RoundConfig, RoundOrchestrator, RoundReport, TaskOutcome, TaskReport};
pub use scheduler::{RoundObserver, Scheduler};
pub use session::{AxiomSessionProvider, Session, SessionError, SessionProvider};
pub use writer::{ArtifactWriter, FsArtifactWriter, SavedArtifact, WriterError};
