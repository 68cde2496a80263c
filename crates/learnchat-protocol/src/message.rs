//! Chat transcript entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the person using the widget.
    User,
    /// Message produced by the assistant (or by the widget on its behalf).
    Bot,
}

/// Single entry in the conversation history.
///
/// Messages are never edited after creation; the history only grows, or is
/// replaced wholesale when the chat is cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Author of the message.
    pub sender: Sender,
    /// Message body.
    pub text: String,
    /// Creation time, serialized as an ISO-8601 string.
    pub timestamp: DateTime<Utc>,
    /// Marks bot messages that describe a failed exchange.
    #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ChatMessage {
    /// Create a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    /// Create a bot reply stamped with the current time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    /// Create an error-flagged bot message stamped with the current time.
    pub fn bot_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::bot(text)
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
