//! Tidings Runtime - configuration, logging and session ownership.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `TidingsConfig`)
//! - Logging configuration (`LoggingBuilder`, `init_from_config`)
//! - Session ownership of a bus (`Session`, `SessionBuilder`)
//!
//! ```ignore
//! use tidings_runtime::Session;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads tidings.toml and TIDINGS_* variables, then sets up logging
//!     let session = Session::builder().build()?;
//!
//!     run_game(session.bus().clone());
//!
//!     // Drops every listener without invoking it
//!     session.shutdown();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoggingConfig, SessionConfig, TidingsConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents, init_from_config};
pub use session::{Session, SessionBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
