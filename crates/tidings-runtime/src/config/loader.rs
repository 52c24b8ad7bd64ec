//! Configuration loader using figment.
//!
//! This module provides a layered configuration loading system that supports:
//!
//! - **Multiple sources**: TOML files, environment variables, programmatic defaults
//! - **Layered configuration**: Later sources override earlier ones
//! - **Profile support**: Development vs production configurations
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`tidings.toml`)
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides passed to [`ConfigLoader::merge`]
//! 3. Main config file (`tidings.toml`)
//! 4. Profile-specific config file (`tidings.{profile}.toml`)
//! 5. Environment variables (`TIDINGS_*`)
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `TIDINGS_` prefix with `__` as separator:
//!
//! - `TIDINGS_SESSION__NAME=arena` → `session.name = "arena"`
//! - `TIDINGS_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `TIDINGS_LOGGING__FILTERS__TIDINGS_CORE=trace` → `logging.filters.tidings_core = "trace"`
//!
//! # Example
//!
//! ```rust,ignore
//! use tidings_runtime::config::ConfigLoader;
//!
//! // Simple loading from default locations
//! let config = ConfigLoader::new().load()?;
//!
//! // Load from specific file with a profile
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/tidings.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::TidingsConfig;
use super::validation::validate_config;

/// Environment variable prefix.
const ENV_PREFIX: &str = "TIDINGS_";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting short aliases.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `TIDINGS_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var("TIDINGS_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
///
/// # Example
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .file("tidings.toml")
///     .with_env()
///     .load()?;
/// ```
pub struct ConfigLoader {
    /// Base figment instance.
    figment: Figment,
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Profile::parse(&profile.into());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("tidings"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = ConfigLoader::new()
    ///     .merge(TidingsConfig {
    ///         logging: LoggingConfig { level: LogLevel::Debug, ..Default::default() },
    ///         ..Default::default()
    ///     })
    ///     .load()?;
    /// ```
    pub fn merge(mut self, config: TidingsConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<TidingsConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: TidingsConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            session = %config.session.name,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        // Start with defaults
        let mut figment = Figment::from(Serialized::defaults(TidingsConfig::default()));

        // Merge user's pre-configured figment
        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        // Load config files
        if let Some(path) = &self.config_file {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
                figment = Self::merge_config_file(figment, path)?;
            } else {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
        } else {
            figment = self.load_config_files(figment);
        }

        // Load environment variables
        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("tidings"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Searches for and loads configuration files from search paths.
    ///
    /// The first search path holding either file ends the search. There the
    /// base file is merged first and the profile-specific file on top of it.
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let mut found = false;

        #[cfg(feature = "toml-config")]
        for search_path in self.resolve_search_paths() {
            let base_path = search_path.join("tidings.toml");
            let profile_path = search_path.join(format!("tidings.{}.toml", self.profile));

            if base_path.exists() {
                info!(path = %base_path.display(), "Loading configuration file");
                figment = figment.merge(Toml::file(&base_path));
                found = true;
            }
            if profile_path.exists() {
                debug!(path = %profile_path.display(), "Loading profile-specific config");
                figment = figment.merge(Toml::file(&profile_path));
                found = true;
            }
            if found {
                break;
            }
        }

        if !found {
            warn!("No configuration file found, using defaults");
        }
        figment
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<TidingsConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file, with environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<TidingsConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================
