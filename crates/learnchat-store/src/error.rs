//! Error types for local persistence.

/// Errors returned by key-value stores and the helpers built on them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The backing file does not hold a JSON object of strings.
    #[error("corrupt store file {path}: {message}")]
    Corrupt { path: String, message: String },
}
