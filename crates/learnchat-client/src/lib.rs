//! HTTP clients for the learning platform API.
//!
//! [`ChatTransport`] and [`CatalogClient`] are the seams the widget controller
//! depends on; the `Http*` types are the reqwest-backed implementations.

mod api;
mod auth;
mod catalog;
mod error;
mod transport;

pub use api::ApiClient;
pub use auth::AuthClient;
pub use catalog::{CatalogClient, HttpCatalogClient};
pub use error::{AuthError, CatalogError, ChatError};
pub use transport::{ChatTransport, HttpChatTransport, SuggestionSource, Suggestions};
