//! Bus configuration.

use serde::{Deserialize, Serialize};

/// Settings for a single [`Bus`](crate::Bus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Name of the owning session, included in diagnostics.
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Dump payload contents at `TRACE` level on every broadcast.
    #[serde(default = "default_trace_payloads")]
    pub trace_payloads: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            session_name: default_session_name(),
            trace_payloads: default_trace_payloads(),
        }
    }
}

impl BusConfig {
    /// Config with the given session name and default settings otherwise.
    pub fn named(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            ..Self::default()
        }
    }
}

fn default_session_name() -> String {
    "default".to_string()
}

fn default_trace_payloads() -> bool {
    true
}
