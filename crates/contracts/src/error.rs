//! Layered error definitions
//!
//! Categorized by source: signal usage / emission / configuration

use thiserror::Error;

use crate::BoxError;

/// Errors raised by signal construction, registration and emission
///
/// Construction, registration and argument errors are returned synchronously
/// by the call that caused them. `Slot` and `Processor` errors only ever reach
/// the caller through the emission's completion callback.
#[derive(Debug, Error)]
pub enum SignalError {
    // ===== Synchronous Misuse =====
    /// Negative parameter count at construction
    #[error("invalid parameter count {param_count}: must be >= 0")]
    Configuration { param_count: i64 },

    /// Slot arity disagrees with the signal's parameter count
    #[error("slot declares {declared} parameters, signal expects {expected}")]
    ArityMismatch { declared: usize, expected: usize },

    /// Wrong number of emitted arguments
    #[error("emit received {supplied} arguments, signal expects {expected}")]
    ArgumentCount { supplied: usize, expected: usize },

    /// Emission requested outside a tokio runtime
    #[error("emit must be called from within a tokio runtime")]
    Runtime,

    // ===== Emission Failures =====
    /// A slot reported failure (or panicked)
    #[error("slot #{index} failed: {source}")]
    Slot {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The result processor failed (or panicked)
    #[error("result processor failed: {source}")]
    Processor {
        #[source]
        source: BoxError,
    },

    /// The emission task ended without reporting an outcome
    #[error("emission aborted before reporting an outcome")]
    Aborted,
}

impl SignalError {
    /// Create slot failure error
    pub fn slot(index: usize, source: impl Into<BoxError>) -> Self {
        Self::Slot {
            index,
            source: source.into(),
        }
    }

    /// Create processor failure error
    pub fn processor(source: impl Into<BoxError>) -> Self {
        Self::Processor {
            source: source.into(),
        }
    }

    /// Whether this error was detected before any slot ran
    pub fn is_synchronous(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::ArityMismatch { .. }
                | Self::ArgumentCount { .. }
                | Self::Runtime
        )
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ContractError {
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
