//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, SessionConfig, TidingsConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &TidingsConfig) -> ConfigResult<()> {
    validate_session_config(&config.session)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates session settings.
fn validate_session_config(session: &SessionConfig) -> ConfigResult<()> {
    if session.name.trim().is_empty() {
        return Err(ConfigError::missing_field("session.name"));
    }

    if session.name.chars().any(char::is_control) {
        return Err(ConfigError::validation(
            "Session name cannot contain control characters",
        ));
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        match &logging.file_path {
            None => return Err(ConfigError::missing_field("logging.file_path")),
            Some(path) if path.file_name().is_none() => {
                return Err(ConfigError::validation(format!(
                    "Log file path has no file name: {}",
                    path.display()
                )));
            }
            Some(_) => {}
        }
    }

    if let Some(target) = logging.filters.keys().find(|target| target.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Log filter target cannot be empty: {target:?}"
        )));
    }

    Ok(())
}
