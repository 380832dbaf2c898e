//! Shared error definitions
//!
//! Configuration and provisioning failures. Emission failures live in the
//! emitter crate.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Sink could not be opened
    #[error("failed to open sink '{target}': {message}")]
    SinkOpen { target: String, message: String },

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

    /// Create sink open error
    pub fn sink_open(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkOpen {
            target: target.into(),
            message: message.into(),
        }
    }
}
