//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    /// A config file is not valid JSON5.
    #[error("failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    /// The merged value does not decode into the config model.
    #[error("failed to decode config: {0}")]
    Decode(#[from] serde_json::Error),
    /// A field has the wrong shape or is not part of the schema.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// A cross-field rule was violated.
    #[error("invalid config: {0}")]
    Invalid(String),
}
