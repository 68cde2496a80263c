//! Chat transport for the assistant endpoints.

use crate::api::ApiClient;
use crate::error::ChatError;
use async_trait::async_trait;
use learnchat_protocol::{ChatReply, ChatRequest, SuggestionsResponse};
use log::{debug, error, warn};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const CHAT_PATH: &str = "/ai/chat";
const SUGGESTIONS_PATH: &str = "/ai/suggestions";

/// Where a suggestion list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Returned by the API.
    Live,
    /// The fixed fallback list.
    Fallback,
}

/// Quick-reply suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    /// Suggestion labels in display order.
    pub items: Vec<String>,
    /// Origin of the list.
    pub source: SuggestionSource,
}

impl Suggestions {
    /// Wrap the fallback list.
    pub fn fallback(items: Vec<String>) -> Self {
        Self {
            items,
            source: SuggestionSource::Fallback,
        }
    }

    /// Whether the fallback list was used.
    pub fn is_fallback(&self) -> bool {
        self.source == SuggestionSource::Fallback
    }
}

/// Sends chat messages to the assistant.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one message with its context and return the assistant reply.
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;

    /// Fetch quick-reply suggestions; never fails, falling back to a fixed list.
    async fn get_chat_suggestions(&self, token: Option<&str>) -> Suggestions;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    api: ApiClient,
    chat_timeout: Option<Duration>,
    fallback_suggestions: Vec<String>,
}

impl HttpChatTransport {
    /// Create a transport; `chat_timeout` of `None` leaves chat calls unbounded.
    pub fn new(
        api: ApiClient,
        chat_timeout: Option<Duration>,
        fallback_suggestions: Vec<String>,
    ) -> Self {
        Self {
            api,
            chat_timeout,
            fallback_suggestions,
        }
    }

    async fn fetch_suggestions(&self, token: &str) -> Result<Vec<String>, String> {
        let response = self
            .api
            .http()
            .get(self.api.url(SUGGESTIONS_PATH))
            .bearer_auth(token)
            .timeout(self.api.request_timeout())
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("status {status}"));
        }
        let body: SuggestionsResponse = response.json().await.map_err(|err| err.to_string())?;
        if body.suggestions.is_empty() {
            return Err("empty suggestion list".to_string());
        }
        Ok(body.suggestions)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send_chat_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        debug!(
            "sending chat message (message_len={}, context_len={})",
            request.message.len(),
            request.context.len()
        );
        let mut builder = self.api.http().post(self.api.url(CHAT_PATH)).json(request);
        if let Some(timeout) = self.chat_timeout {
            builder = builder.timeout(timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("chat request failed: {err}");
                return Err(classify_transport_error(&err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("chat request rejected (status={status}, body_len={})", body.len());
            return Err(classify_status(status, &body));
        }

        match response.json::<ChatReply>().await {
            Ok(reply) => Ok(reply),
            Err(err) if err.is_timeout() => {
                error!("chat response timed out: {err}");
                Err(ChatError::Timeout)
            }
            Err(err) => {
                error!("chat response could not be decoded: {err}");
                Err(ChatError::InvalidResponse)
            }
        }
    }

    async fn get_chat_suggestions(&self, token: Option<&str>) -> Suggestions {
        let Some(token) = token else {
            debug!("no token for suggestions; using fallback");
            return Suggestions::fallback(self.fallback_suggestions.clone());
        };
        match self.fetch_suggestions(token).await {
            Ok(items) => Suggestions {
                items,
                source: SuggestionSource::Live,
            },
            Err(err) => {
                warn!("suggestions unavailable, using fallback: {err}");
                Suggestions::fallback(self.fallback_suggestions.clone())
            }
        }
    }
}

/// Map a request that produced no response.
fn classify_transport_error(err: &reqwest::Error) -> ChatError {
    if err.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
        return ChatError::RateLimited;
    }
    if err.is_timeout() {
        return ChatError::Timeout;
    }
    if err.is_connect() || err.is_request() {
        return ChatError::Connectivity;
    }
    ChatError::Unavailable
}

/// Map a non-success response.
fn classify_status(status: StatusCode, body: &str) -> ChatError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ChatError::RateLimited;
    }
    if status.is_server_error() {
        return ChatError::Server {
            status: status.as_u16(),
        };
    }
    if status.is_client_error() {
        if let Some(message) = server_message(body) {
            return ChatError::Rejected(message);
        }
    }
    ChatError::Unavailable
}

/// `message` or `error` string from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
