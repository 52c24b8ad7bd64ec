//! Session ownership of a bus.
//!
//! A [`Session`] owns exactly one [`Bus`] for the lifetime of a logical
//! session and tears it down when the session ends. Producers and consumers
//! receive the bus from the session explicitly; there is no process-wide
//! accessor.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidings_runtime::Session;
//!
//! // Loads tidings.toml and TIDINGS_* variables, then initializes logging
//! let session = Session::builder().build()?;
//!
//! let bus = session.bus().clone();
//! bus.register(channel, |_, damage: &Damage| { /* ... */ }, MatchMode::Exact);
//!
//! session.shutdown();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use tidings_core::{Bus, BusConfig, DispatchStats};
use tracing::{debug, info};

use crate::config::{ConfigLoader, TidingsConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// Owner of one bus for the duration of a logical session.
///
/// Dropping the session (or calling [`shutdown`](Self::shutdown)) clears the
/// bus: every listener is discarded without being invoked. Clones of the bus
/// handed out earlier stay usable but start from an empty registry.
#[derive(Debug)]
pub struct Session {
    bus: Bus,
    closed: AtomicBool,
}

impl Session {
    /// Creates a session around a fresh bus.
    pub fn new(config: BusConfig) -> Self {
        info!(session = %config.session_name, "Session started");
        Self {
            bus: Bus::with_config(config),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a session from a loaded configuration.
    ///
    /// Validates the configuration but does not touch logging; use
    /// [`SessionBuilder`] for that.
    pub fn from_config(config: &TidingsConfig) -> RuntimeResult<Self> {
        validate_config(config)?;
        Ok(Self::new(config.session.to_bus_config()))
    }

    /// Creates a builder that loads configuration and initializes logging.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The bus owned by this session.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The session name.
    pub fn name(&self) -> &str {
        &self.bus.config().session_name
    }

    /// Returns `true` once the session has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Tears down the bus. Calling this more than once has no further effect.
    ///
    /// Returns the dispatch counters as they were at teardown.
    pub fn shutdown(&self) -> DispatchStats {
        let stats = self.bus.stats();
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!(session = %self.name(), "Session already shut down");
            return stats;
        }

        let channels = self.bus.channel_count();
        self.bus.clear();
        info!(
            session = %self.name(),
            channels,
            %stats,
            "Session shut down"
        );
        stats
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// SessionBuilder
// =============================================================================

/// Builder for creating a `Session` from layered configuration.
///
/// # Example
///
/// ```rust,ignore
/// let session = Session::builder()
///     .config_file("config/tidings.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct SessionBuilder {
    config_loader: ConfigLoader,
    init_logging: bool,
}

impl SessionBuilder {
    /// Creates a new session builder searching the current directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: TidingsConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Leaves the global subscriber alone (default: initialize it).
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Loads the configuration and builds the session.
    pub fn build(self) -> RuntimeResult<Session> {
        let config = self.config_loader.load()?;
        if self.init_logging {
            logging::init_from_config(&config.logging);
        }
        Session::from_config(&config)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::RuntimeError;
    use figment::Jail;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use tidings_core::{Channel, MatchMode, Message, PayloadType};

    fn counting_listener(bus: &Bus, path: &str) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        bus.register_raw(
            Channel::new(path).unwrap(),
            move |_: &Channel, _: PayloadType, _: &dyn Message| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            },
            None,
            MatchMode::Partial,
        );
        hits
    }

    #[test]
    fn test_from_config_names_the_bus() {
        let config = TidingsConfig {
            session: SessionConfig {
                name: "arena".into(),
                trace_payloads: false,
            },
            ..Default::default()
        };

        let session = Session::from_config(&config).unwrap();

        assert_eq!(session.name(), "arena");
        assert!(!session.bus().config().trace_payloads);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = TidingsConfig::default();
        config.session.name.clear();

        assert!(matches!(
            Session::from_config(&config),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let session = Session::new(BusConfig::named("test"));
        let bus = session.bus().clone();
        let _hits = counting_listener(&bus, "Game");
        assert_eq!(bus.channel_count(), 1);

        session.shutdown();
        session.shutdown();

        assert!(session.is_shut_down());
        assert_eq!(bus.channel_count(), 0);
    }

    #[test]
    fn test_drop_tears_down_the_bus() {
        let session = Session::new(BusConfig::named("test"));
        let bus = session.bus().clone();
        let hits = counting_listener(&bus, "Game");

        drop(session);
        bus.broadcast_dyn(&Channel::new("Game").unwrap(), &NoPayload);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!bus.is_channel_tracked(&Channel::new("Game").unwrap()));
    }

    #[test]
    fn test_builder_loads_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TIDINGS_SESSION__NAME", "from-env");

            let session = Session::builder()
                .search_path(jail.directory())
                .without_logging()
                .build()
                .map_err(|e| e.to_string())?;

            assert_eq!(session.name(), "from-env");
            Ok(())
        });
    }

    #[derive(Debug)]
    struct NoPayload;

    impl Message for NoPayload {
        fn static_type() -> PayloadType {
            PayloadType::root::<Self>("NoPayload")
        }

        fn payload_type(&self) -> PayloadType {
            Self::static_type()
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }
}
