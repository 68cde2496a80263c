//! Wire and storage types shared by the learnchat crates.

mod catalog;
mod chat;
mod event;
mod message;
mod profile;

pub use catalog::{CourseRef, Enrollment, ProgressRecord};
pub use chat::{ChatReply, ChatRequest, SuggestionsResponse};
pub use event::{EventSink, NullEventSink, WidgetEvent};
pub use message::{ChatMessage, Sender};
pub use profile::UserProfile;

/// Storage key holding the serialized conversation history.
pub const CHAT_HISTORY_KEY: &str = "chatHistory";
/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialized current user profile.
pub const CURRENT_USER_KEY: &str = "currentUser";
