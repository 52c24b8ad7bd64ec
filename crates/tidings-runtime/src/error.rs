//! Runtime error types.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A global tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
