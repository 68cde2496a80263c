//! Local persistence for the chat client.
//!
//! Everything is stored through the [`KeyValueStore`] capability so callers
//! can inject an in-memory store in tests and a file-backed one in binaries.

pub mod auth;
pub mod error;
pub mod file;
pub mod history;
pub mod kv;

/// Cached token and profile of the signed-in user.
pub use auth::AuthSession;
/// Store error type.
pub use error::StoreError;
/// JSON file backed store.
pub use file::FileStore;
/// Conversation history persistence.
pub use history::{ConversationStore, HistoryLoad};
/// Key-value capability and in-memory implementation.
pub use kv::{KeyValueStore, MemoryStore};
