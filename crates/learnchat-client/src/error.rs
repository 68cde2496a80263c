//! Error types for the API clients.

use learnchat_store::StoreError;
use thiserror::Error;

/// Failure of a chat exchange.
///
/// `Display` is the text shown to the user; transport details are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The API answered 429.
    #[error("I'm getting a lot of questions right now. Please wait a moment 🙏")]
    RateLimited,
    /// No answer within the chat timeout.
    #[error("Request timed out. Please try again.")]
    Timeout,
    /// The API could not be reached at all.
    #[error("Unable to connect. Please check your internet connection 🌐")]
    Connectivity,
    /// The API answered with a 5xx status.
    #[error("Server error. Please try again in a moment 🔧")]
    Server { status: u16 },
    /// The API rejected the request and explained why.
    #[error("{0}")]
    Rejected(String),
    /// Any other failure.
    #[error("Unable to reach AI assistant. Please try again later.")]
    Unavailable,
    /// A success status whose body is not a chat reply.
    #[error(
        "I apologize, but I'm experiencing technical difficulties right now. Please try again in a moment. 🔧"
    )]
    InvalidResponse,
}

/// Failure of an enrollment or progress lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status.
    #[error("catalog request to {path} returned {status}")]
    Status { path: String, status: u16 },
    /// Reading the stored token failed.
    #[error("catalog credentials unavailable: {0}")]
    Store(#[from] StoreError),
    /// Collaborator-specific failure.
    #[error("catalog error: {0}")]
    Other(String),
}

/// Failure of a profile update.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The new name was blank.
    #[error("Name is required")]
    NameRequired,
    /// Transport-level failure.
    #[error("profile request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status, with the server message when one was sent.
    #[error("profile update rejected ({status}): {message}")]
    Status { status: u16, message: String },
    /// Reading or writing the cached profile failed.
    #[error("profile cache error: {0}")]
    Store(#[from] StoreError),
}
