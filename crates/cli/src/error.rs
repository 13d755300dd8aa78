//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Requested signal is not configured
    #[error("Signal '{name}' not found (configured: {available})")]
    SignalNotFound { name: String, available: String },

    /// Emitted argument is not valid JSON
    #[error("Argument #{position} is not valid JSON: {message}")]
    InvalidArgument { position: usize, message: String },

    /// Emission did not report in time
    #[error("Signal '{name}' did not report within {secs}s")]
    Timeout { name: String, secs: u64 },

    /// Signal misuse detected before any slot ran
    #[error("Emission rejected: {0}")]
    Rejected(#[from] contracts::SignalError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn signal_not_found<'a>(
        name: impl Into<String>,
        available: impl Iterator<Item = &'a str>,
    ) -> Self {
        let available = available.collect::<Vec<_>>().join(", ");
        Self::SignalNotFound {
            name: name.into(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available
            },
        }
    }

    pub fn invalid_argument(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            position,
            message: message.into(),
        }
    }

    pub fn timeout(name: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            name: name.into(),
            secs,
        }
    }
}
