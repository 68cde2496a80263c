//! Configuration schema for learnchat.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root config for the chat client.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LearnchatConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
}

impl LearnchatConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> LearnchatConfigBuilder {
        LearnchatConfigBuilder::new()
    }
}

/// Builder for assembling a `LearnchatConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct LearnchatConfigBuilder {
    config: LearnchatConfig,
}

impl LearnchatConfigBuilder {
    /// Create a builder seeded with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the API configuration.
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.config.api = api;
        self
    }

    /// Replace the widget configuration.
    pub fn widget(mut self, widget: WidgetConfig) -> Self {
        self.config.widget = widget;
        self
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the suggestions configuration.
    pub fn suggestions(mut self, suggestions: SuggestionsConfig) -> Self {
        self.config.suggestions = suggestions;
        self
    }

    /// Finalize and return the built config.
    pub fn build(self) -> LearnchatConfig {
        self.config
    }
}

/// Remote API endpoints and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for `POST /ai/chat`; `null` disables it.
    #[serde(default = "default_chat_timeout_ms")]
    pub chat_timeout_ms: Option<u64>,
    /// Timeout for every other request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    /// Chat timeout as a duration, if bounded.
    pub fn chat_timeout(&self) -> Option<Duration> {
        self.chat_timeout_ms.map(Duration::from_millis)
    }

    /// Timeout for non-chat requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_timeout_ms: default_chat_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_chat_timeout_ms() -> Option<u64> {
    Some(15_000)
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Behavior of the chat widget controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetConfig {
    /// Cosmetic delay between receiving a reply and showing it.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
    /// Number of enrollments whose progress is looked up for the context.
    #[serde(default = "default_max_progress_courses")]
    pub max_progress_courses: usize,
    /// Quick actions are offered while the history has at most this many messages.
    #[serde(default = "default_quick_actions_max_messages")]
    pub quick_actions_max_messages: usize,
}

impl WidgetConfig {
    /// Typing delay as a duration.
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            max_progress_courses: default_max_progress_courses(),
            quick_actions_max_messages: default_quick_actions_max_messages(),
        }
    }
}

fn default_typing_delay_ms() -> u64 {
    800
}

fn default_max_progress_courses() -> usize {
    5
}

fn default_quick_actions_max_messages() -> usize {
    2
}

/// Local persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Path of the JSON key-value file; defaults to the user data directory.
    #[serde(default)]
    pub path: Option<String>,
}

/// Quick-reply suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionsConfig {
    /// Suggestions shown when the live list cannot be fetched.
    #[serde(default = "default_fallback_suggestions")]
    pub fallback: Vec<String>,
    /// Emit a visible notice when the fallback list is used.
    #[serde(default)]
    pub notify_on_fallback: bool,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback_suggestions(),
            notify_on_fallback: false,
        }
    }
}

/// Fixed list used whenever live suggestions are unavailable.
pub fn default_fallback_suggestions() -> Vec<String> {
    [
        "Recommend a course for me",
        "How am I doing in my courses?",
        "Give me some study tips",
        "What should I learn next?",
    ]
    .iter()
    .map(|item| item.to_string())
    .collect()
}
