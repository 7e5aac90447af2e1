use crate::app::{ConfigError, InitializationError};
use crate::collector::CollectorError;
use thiserror::Error;

/// Top-level error type for a relay run.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collection error: {0}")]
    Collector(#[from] CollectorError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(#[from] InitializationError),
}
