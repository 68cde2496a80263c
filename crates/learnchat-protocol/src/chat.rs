//! Request and response bodies for the assistant endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// User message, already trimmed.
    pub message: String,
    /// Personalization context built for the active user.
    pub context: String,
}

impl ChatRequest {
    /// Create a new chat request.
    pub fn new(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
        }
    }
}

/// Response of `POST /ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant reply text.
    pub reply: String,
}

/// Response of `GET /ai/suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}
