use async_trait::async_trait;
use learnchat_client::{ChatError, ChatTransport, SuggestionSource, Suggestions};
use learnchat_protocol::{ChatReply, ChatRequest};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Transport that replays queued results and records every request.
///
/// When the queue is empty the transport echoes the message back.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<String, ChatError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    suggestion_tokens: Arc<Mutex<Vec<Option<String>>>>,
    suggestions: Option<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, err: ChatError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    /// Delay every chat call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serve `items` as live suggestions; otherwise suggestions are a fallback.
    pub fn with_suggestions(mut self, items: Vec<String>) -> Self {
        self.suggestions = Some(items);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// Tokens passed to each suggestion lookup.
    pub fn suggestion_tokens(&self) -> Vec<Option<String>> {
        self.suggestion_tokens.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().pop_front();
        match next {
            Some(Ok(reply)) => Ok(ChatReply { reply }),
            Some(Err(err)) => Err(err),
            None => Ok(ChatReply {
                reply: format!("echo: {}", request.message),
            }),
        }
    }

    async fn get_chat_suggestions(&self, token: Option<&str>) -> Suggestions {
        self.suggestion_tokens
            .lock()
            .push(token.map(str::to_string));
        match (&self.suggestions, token) {
            (Some(items), Some(_)) => Suggestions {
                items: items.clone(),
                source: SuggestionSource::Live,
            },
            _ => Suggestions::fallback(vec!["fallback".to_string()]),
        }
    }
}
