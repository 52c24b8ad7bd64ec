//! Configuration module for the Tidings runtime.
//!
//! This module provides figment-based layered configuration loading and
//! validation for the session and logging settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, SessionConfig, SpanEventConfig, TidingsConfig,
};
pub use validation::validate_config;
