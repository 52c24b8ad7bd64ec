//! Logging utilities for Tidings.
//!
//! This module provides a unified logging setup using `tracing` and `tracing-subscriber`.
//! It supports configuration-driven initialization and span events for observing
//! the `broadcast` span the bus opens around every dispatch.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! use tidings_runtime::config::load_config;
//! use tidings_runtime::logging;
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! use tidings_runtime::logging::{LoggingBuilder, SpanEvents};
//!
//! LoggingBuilder::new()
//!     .directive("tidings_core=trace")
//!     .span_events(SpanEvents::LIFECYCLE)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

/// Span event configuration for logging.
///
/// Controls when lifecycle events of the `broadcast` span (and any span the
/// application opens) are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanEvents {
    /// Log when a span is created (entered for the first time).
    pub new: bool,
    /// Log when a span is entered.
    pub enter: bool,
    /// Log when a span is exited.
    pub exit: bool,
    /// Log when a span is closed (dropped).
    pub close: bool,
}

impl SpanEvents {
    /// No span events will be logged.
    pub const NONE: Self = Self {
        new: false,
        enter: false,
        exit: false,
        close: false,
    };

    /// Log span creation and close events.
    ///
    /// Shows each broadcast once at start and once at the end, with its
    /// busy time, without the enter/exit noise of nested broadcasts.
    pub const LIFECYCLE: Self = Self {
        new: true,
        enter: false,
        exit: false,
        close: true,
    };

    /// Log all span events (new, enter, exit, close).
    pub const FULL: Self = Self {
        new: true,
        enter: true,
        exit: true,
        close: true,
    };

    /// Log only enter and exit events.
    pub const ACTIVE: Self = Self {
        new: false,
        enter: true,
        exit: true,
        close: false,
    };

    /// Convert to `tracing_subscriber::fmt::format::FmtSpan` flags.
    fn to_fmt_span(self) -> fmt::format::FmtSpan {
        let mut span = fmt::format::FmtSpan::NONE;
        if self.new {
            span |= fmt::format::FmtSpan::NEW;
        }
        if self.enter {
            span |= fmt::format::FmtSpan::ENTER;
        }
        if self.exit {
            span |= fmt::format::FmtSpan::EXIT;
        }
        if self.close {
            span |= fmt::format::FmtSpan::CLOSE;
        }
        span
    }
}

impl From<&SpanEventConfig> for SpanEvents {
    fn from(config: &SpanEventConfig) -> Self {
        Self {
            new: config.new,
            enter: config.enter,
            exit: config.exit,
            close: config.close,
        }
    }
}

// =============================================================================
// Configuration-Based Initialization
// =============================================================================

/// Initialize logging from a `LoggingConfig`.
///
/// Installs a global subscriber built from the configuration. Does nothing
/// if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

// =============================================================================
// LoggingBuilder
// =============================================================================

/// A builder for configuring logging.
///
/// # Example
///
/// ```rust,ignore
/// use tidings_runtime::logging::{LoggingBuilder, SpanEvents};
/// use tracing::Level;
///
/// LoggingBuilder::new()
///     .with_level(Level::DEBUG)
///     .span_events(SpanEvents::LIFECYCLE)
///     .with_thread_ids(true)
///     .init();
/// ```
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    span_events: SpanEvents,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Create a LoggingBuilder from a LoggingConfig.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            directives: config
                .filters
                .iter()
                .map(|(target, level)| format!("{target}={level}"))
                .collect(),
            level: Some(config.level.to_tracing_level()),
            span_events: SpanEvents::from(&config.span_events),
            format: config.format,
            output: config.output,
            with_target: true,
            with_thread_ids: config.thread_ids,
            with_file: config.file_location,
            with_line_number: config.file_location,
            file_path: config.file_path.clone(),
        }
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add a filter directive.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// builder.directive("tidings_core=debug")
    ///        .directive("tidings_runtime=trace")
    /// ```
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Configure which span lifecycle events are logged.
    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Include source file and line number in log output.
    pub fn with_file_location(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self.with_line_number = enabled;
        self
    }

    /// Set file path for file output.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Build the filter. `RUST_LOG` replaces the base level when set;
    /// directives are added on top either way.
    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);

        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(base_level.as_str().to_lowercase()));

        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(err) => eprintln!("Ignoring invalid log directive {directive:?}: {err}"),
            }
        }

        filter
    }

    /// Choose the writer for the configured output.
    fn build_writer(&self) -> BoxMakeWriter {
        match (self.output, &self.file_path) {
            (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
            (LogOutput::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .unwrap_or_else(|| OsStr::new("tidings.log"));
                BoxMakeWriter::new(tracing_appender::rolling::never(directory, file_name))
            }
            (LogOutput::File, None) => {
                eprintln!("File output requested but no file path configured, using stdout");
                BoxMakeWriter::new(std::io::stdout)
            }
        }
    }

    /// Initialize the logging system, ignoring an already installed subscriber.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();
        let writer = self.build_writer();
        let span_events = self.span_events.to_fmt_span();
        let registry = tracing_subscriber::registry().with(filter);

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_span_events(span_events)
                    .with_target(self.with_target)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
                    .with_writer(writer)
            };
        }

        match self.format {
            #[cfg(feature = "json-log")]
            LogFormat::Json => registry
                .with(configure_layer!(fmt::layer().json()))
                .try_init(),
            LogFormat::Compact => registry
                .with(configure_layer!(fmt::layer().compact()))
                .try_init(),
            LogFormat::Full => registry.with(configure_layer!(fmt::layer())).try_init(),
            LogFormat::Pretty => registry
                .with(configure_layer!(fmt::layer().pretty()))
                .try_init(),
        }
    }
}
