//! Error types for rollguard-core

use thiserror::Error;

/// Result type alias using rollguard-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for rollguard
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A policy or threshold value is out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An observation carries values outside their valid domain
    #[error("Invalid observation: {message}")]
    InvalidObservation { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid observation error
    pub fn invalid_observation(message: impl Into<String>) -> Self {
        Self::InvalidObservation {
            message: message.into(),
        }
    }

    /// Whether this error was raised while validating configuration
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Whether retrying the failed call could succeed
    ///
    /// Only IO failures qualify. A document that parses badly or carries
    /// out-of-range values fails the same way on every read.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
