//! Conversation history persistence.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use learnchat_protocol::{CHAT_HISTORY_KEY, ChatMessage};
use log::{debug, warn};
use std::sync::Arc;

/// Result of reading the persisted history.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryLoad {
    /// A non-empty history was stored and decoded.
    Restored(Vec<ChatMessage>),
    /// Nothing (or an empty list) was stored.
    Missing,
    /// The stored value could not be decoded.
    Corrupt,
}

/// Reads and writes the conversation under the `chatHistory` key.
#[derive(Clone)]
pub struct ConversationStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    /// Wrap a key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted history.
    ///
    /// Decode failures are reported as [`HistoryLoad::Corrupt`] rather than an
    /// error so the caller can reseed the conversation.
    pub fn load(&self) -> Result<HistoryLoad, StoreError> {
        let Some(raw) = self.store.get(CHAT_HISTORY_KEY)? else {
            return Ok(HistoryLoad::Missing);
        };
        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) if messages.is_empty() => Ok(HistoryLoad::Missing),
            Ok(messages) => {
                debug!("restored chat history (messages={})", messages.len());
                Ok(HistoryLoad::Restored(messages))
            }
            Err(err) => {
                warn!("failed to parse chat history (len={}): {err}", raw.len());
                Ok(HistoryLoad::Corrupt)
            }
        }
    }

    /// Persist the full history, replacing what was stored.
    pub fn save(&self, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(messages)?;
        self.store.set(CHAT_HISTORY_KEY, &serialized)
    }

    /// Erase the persisted history.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CHAT_HISTORY_KEY)
    }
}
