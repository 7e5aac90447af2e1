pub mod config;
pub mod logging_system;
pub mod relay;
pub mod shutdown;

pub use config::{Config, ConfigError, LogLevel, SourceKind};
pub use logging_system::{InitializationError, LoggingSystem, setup_logging_safe};
pub use relay::{Relay, RunSummary};
pub use shutdown::shutdown_signal;

use crate::collector::{FirmwareProcess, ReaderSource, SimulatedFirmware};
use crate::domain::RelayError;
use crate::report::{ReportSink, WriterSink};
use std::process;
use tracing::{error, info};

pub struct App {
    config: Config,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, RelayError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Relay the configured source to stdout until it is exhausted or a
    /// shutdown signal arrives.
    pub async fn run(self) -> Result<RunSummary, RelayError> {
        let mut sink = WriterSink::stdout();
        self.run_with_sink(&mut sink).await
    }

    /// Like [`App::run`], writing reports to `sink` instead of stdout.
    pub async fn run_with_sink<K: ReportSink>(
        &self,
        sink: &mut K,
    ) -> Result<RunSummary, RelayError> {
        let relay = Relay::from_config(&self.config);

        info!("Starting qsafp-relay v{}", crate::VERSION);

        match self.config.source_kind() {
            SourceKind::Process(path) => {
                let source = FirmwareProcess::spawn(&path)?;
                relay.run_until_shutdown(source, sink, shutdown_signal()).await
            }
            SourceKind::Simulated { profile, ticks } => {
                let source = SimulatedFirmware::with_profile(profile, ticks);
                relay.run_until_shutdown(source, sink, shutdown_signal()).await
            }
            SourceKind::Stdin => {
                relay
                    .run_until_shutdown(ReaderSource::stdin(), sink, shutdown_signal())
                    .await
            }
        }
    }
}

// Main entry point for the application
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = match App::from_args(std::env::args_os()) {
        Ok(app) => app,
        // Help, version and usage errors print themselves with the right exit code
        Err(RelayError::Config(ConfigError::Cli(e))) => e.exit(),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = setup_logging_safe(app.config().log_level) {
        eprintln!("Warning: {e}, continuing without diagnostics");
    }

    match app.run().await {
        Ok(summary) => {
            info!("Completed: {:?}", summary);
            Ok(())
        }
        Err(e) => {
            error!("Relay error: {}", e);
            process::exit(1);
        }
    }
}
