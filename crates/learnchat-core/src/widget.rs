//! Chat widget controller.
//!
//! [`ChatWidget`] owns the conversation, the input buffer and the panel
//! flags. Front-ends call its operations and render from its accessors and
//! the [`WidgetEvent`]s it emits.

use crate::context::ContextBuilder;
use crate::error::WidgetError;
use learnchat_client::{CatalogClient, ChatTransport, Suggestions};
use learnchat_config::LearnchatConfig;
use learnchat_protocol::{ChatMessage, ChatRequest, EventSink, UserProfile, WidgetEvent};
use learnchat_store::{AuthSession, ConversationStore, HistoryLoad, KeyValueStore};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const USER_QUICK_ACTIONS: [&str; 3] = ["Recommend a course", "Check my progress", "Study tips"];
const GUEST_QUICK_ACTIONS: [&str; 3] = [
    "What courses are available?",
    "How does this platform work?",
    "Benefits of signing up",
];
const FALLBACK_NOTICE: &str = "Live suggestions are unavailable; showing default suggestions.";

/// Tunables of the widget controller.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSettings {
    /// Pause between receiving a reply and appending it.
    pub typing_delay: Duration,
    /// Enrollments whose progress is included in the context.
    pub max_progress_courses: usize,
    /// Quick actions are offered while the history is at most this long.
    pub quick_actions_max_messages: usize,
    /// Emit a notice when suggestions fall back to the fixed list.
    pub notify_on_fallback: bool,
}

impl WidgetSettings {
    /// Settings from the `widget` and `suggestions` config sections.
    pub fn from_config(config: &LearnchatConfig) -> Self {
        Self {
            typing_delay: config.widget.typing_delay(),
            max_progress_courses: config.widget.max_progress_courses,
            quick_actions_max_messages: config.widget.quick_actions_max_messages,
            notify_on_fallback: config.suggestions.notify_on_fallback,
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self::from_config(&LearnchatConfig::default())
    }
}

/// Collaborators injected into the widget.
#[derive(Clone)]
pub struct WidgetDeps {
    /// Backing store for history and credentials.
    pub store: Arc<dyn KeyValueStore>,
    /// Assistant endpoint.
    pub transport: Arc<dyn ChatTransport>,
    /// Enrollment and progress lookups.
    pub catalog: Arc<dyn CatalogClient>,
    /// Receiver of render events.
    pub events: Arc<dyn EventSink>,
}

/// Outcome of a context rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRefresh {
    /// The rebuilt context replaced the held one.
    Applied,
    /// A newer rebuild started meanwhile; the result was discarded.
    Superseded,
}

struct WidgetState {
    open: bool,
    input: String,
    messages: Vec<ChatMessage>,
    user: Option<UserProfile>,
    context: String,
    context_generation: u64,
    typing: bool,
}

/// Controller for one chat panel.
pub struct ChatWidget {
    settings: WidgetSettings,
    history: ConversationStore,
    session: AuthSession,
    transport: Arc<dyn ChatTransport>,
    context_builder: ContextBuilder,
    events: Arc<dyn EventSink>,
    state: Mutex<WidgetState>,
    sending: AtomicBool,
}

impl ChatWidget {
    /// Create a widget for `user`, restoring the persisted conversation.
    ///
    /// A missing, empty or unreadable history starts with a welcome message.
    /// The context starts empty until [`ChatWidget::refresh_context`] runs.
    pub fn new(settings: WidgetSettings, deps: WidgetDeps, user: Option<UserProfile>) -> Self {
        let history = ConversationStore::new(deps.store.clone());
        let messages = match history.load() {
            Ok(HistoryLoad::Restored(messages)) => messages,
            Ok(HistoryLoad::Missing) => vec![welcome_message(user.as_ref())],
            Ok(HistoryLoad::Corrupt) => {
                warn!("discarding unreadable chat history");
                vec![welcome_message(user.as_ref())]
            }
            Err(err) => {
                warn!("failed to read chat history: {err}");
                vec![welcome_message(user.as_ref())]
            }
        };
        info!(
            "chat widget initialized (messages={}, signed_in={})",
            messages.len(),
            is_signed_in(user.as_ref())
        );
        Self {
            context_builder: ContextBuilder::new(deps.catalog, settings.max_progress_courses),
            settings,
            history,
            session: AuthSession::new(deps.store),
            transport: deps.transport,
            events: deps.events,
            state: Mutex::new(WidgetState {
                open: false,
                input: String::new(),
                messages,
                user,
                context: String::new(),
                context_generation: 0,
                typing: false,
            }),
            sending: AtomicBool::new(false),
        }
    }

    /// Show the panel.
    pub fn open(&self) {
        self.set_open(true);
    }

    /// Hide the panel.
    pub fn close(&self) {
        self.set_open(false);
    }

    /// Flip panel visibility and return the new state.
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    fn set_open(&self, open: bool) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.open != open;
            state.open = open;
            changed
        };
        if changed {
            self.events.emit(WidgetEvent::PanelToggled(open));
        }
    }

    /// Whether the panel is shown.
    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Replace the input buffer.
    pub fn set_input(&self, input: impl Into<String>) {
        self.state.lock().input = input.into();
    }

    pub fn input(&self) -> String {
        self.state.lock().input.clone()
    }

    /// Quick actions currently offered.
    ///
    /// Only offered at the start of a conversation and never while a send is
    /// pending; the labels depend on whether a user is signed in.
    pub fn quick_actions(&self) -> Vec<&'static str> {
        if self.is_sending() {
            return Vec::new();
        }
        let state = self.state.lock();
        if state.messages.len() > self.settings.quick_actions_max_messages {
            return Vec::new();
        }
        if is_signed_in(state.user.as_ref()) {
            USER_QUICK_ACTIONS.to_vec()
        } else {
            GUEST_QUICK_ACTIONS.to_vec()
        }
    }

    /// Copy the label of quick action `index` into the input buffer.
    pub fn apply_quick_action(&self, index: usize) -> Result<&'static str, WidgetError> {
        let label = self
            .quick_actions()
            .get(index)
            .copied()
            .ok_or(WidgetError::QuickActionUnavailable { index })?;
        self.set_input(label);
        Ok(label)
    }

    /// Send the input buffer to the assistant.
    ///
    /// Appends the trimmed user message right away and exactly one bot
    /// message once the exchange resolves; a failed exchange appends an
    /// error-flagged bot message carrying a user-facing explanation and is
    /// still `Ok`. Returns the appended bot message.
    pub async fn send_message(&self) -> Result<ChatMessage, WidgetError> {
        let mut guard = SendGuard::acquire(self).ok_or(WidgetError::SendInFlight)?;

        let (text, context) = {
            let mut state = self.state.lock();
            let text = state.input.trim().to_string();
            if text.is_empty() {
                return Err(WidgetError::EmptyInput);
            }
            state.input.clear();
            state.typing = true;
            (text, state.context.clone())
        };
        guard.started = true;
        self.events.emit(WidgetEvent::SendingChanged(true));
        self.events.emit(WidgetEvent::TypingChanged(true));
        self.append(ChatMessage::user(text.as_str()));

        debug!(
            "sending message (message_len={}, context_len={})",
            text.len(),
            context.len()
        );
        let reply = match self
            .transport
            .send_chat_message(&ChatRequest::new(text, context))
            .await
        {
            Ok(reply) => {
                tokio::time::sleep(self.settings.typing_delay).await;
                ChatMessage::bot(reply.reply)
            }
            Err(err) => {
                warn!("chat exchange failed: {err:?}");
                ChatMessage::bot_error(err.to_string())
            }
        };
        self.append(reply.clone());
        drop(guard);
        Ok(reply)
    }

    /// Start over with a single welcome message and erase the stored history.
    pub fn clear_chat(&self) {
        let len = {
            let mut state = self.state.lock();
            state.messages = vec![welcome_message(state.user.as_ref())];
            state.messages.len()
        };
        if let Err(err) = self.history.clear() {
            warn!("failed to erase chat history: {err}");
        }
        info!("chat cleared");
        self.events.emit(WidgetEvent::HistoryChanged { len });
        self.events.emit(WidgetEvent::ScrollToLatest);
    }

    /// Switch the active user and rebuild the context for them.
    pub async fn set_user(&self, user: Option<UserProfile>) -> ContextRefresh {
        self.state.lock().user = user;
        self.refresh_context().await
    }

    /// Rebuild the context for the active user.
    ///
    /// Only the most recently started rebuild may replace the held context.
    pub async fn refresh_context(&self) -> ContextRefresh {
        let (generation, user) = {
            let mut state = self.state.lock();
            state.context_generation += 1;
            (state.context_generation, state.user.clone())
        };
        let context = self.context_builder.build(user.as_ref()).await;

        let applied = {
            let mut state = self.state.lock();
            if state.context_generation == generation {
                state.context = context;
                true
            } else {
                false
            }
        };
        if applied {
            debug!("context applied (generation={generation})");
            self.events
                .emit(WidgetEvent::ContextUpdated { generation });
            ContextRefresh::Applied
        } else {
            debug!("discarding stale context (generation={generation})");
            ContextRefresh::Superseded
        }
    }

    /// Quick-reply suggestions for the signed-in user.
    pub async fn suggestions(&self) -> Suggestions {
        let token = match self.session.token() {
            Ok(token) => token,
            Err(err) => {
                warn!("failed to read token for suggestions: {err}");
                None
            }
        };
        let suggestions = self.transport.get_chat_suggestions(token.as_deref()).await;
        if suggestions.is_fallback() && self.settings.notify_on_fallback {
            self.events
                .emit(WidgetEvent::Notice(FALLBACK_NOTICE.to_string()));
        }
        suggestions
    }

    /// Snapshot of the conversation.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().messages.clone()
    }

    /// Context sent with the next message.
    pub fn context(&self) -> String {
        self.state.lock().context.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.lock().user.clone()
    }

    /// Whether a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Whether the typing indicator is shown.
    pub fn is_typing(&self) -> bool {
        self.state.lock().typing
    }

    fn append(&self, message: ChatMessage) {
        let snapshot = {
            let mut state = self.state.lock();
            state.messages.push(message);
            state.messages.clone()
        };
        let len = snapshot.len();
        if let Err(err) = self.history.save(&snapshot) {
            warn!("failed to persist chat history (messages={len}): {err}");
        }
        self.events.emit(WidgetEvent::HistoryChanged { len });
        self.events.emit(WidgetEvent::ScrollToLatest);
    }
}

/// Holds the single-flight flag for one send; releasing it also clears the
/// typing indicator, even when the send future is dropped midway.
struct SendGuard<'a> {
    widget: &'a ChatWidget,
    started: bool,
}

impl<'a> SendGuard<'a> {
    fn acquire(widget: &'a ChatWidget) -> Option<Self> {
        widget
            .sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            widget,
            started: false,
        })
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.widget.state.lock().typing = false;
        self.widget.sending.store(false, Ordering::Release);
        if self.started {
            self.widget.events.emit(WidgetEvent::TypingChanged(false));
            self.widget.events.emit(WidgetEvent::SendingChanged(false));
        }
    }
}

fn is_signed_in(user: Option<&UserProfile>) -> bool {
    user.is_some_and(UserProfile::is_authenticated)
}

/// Greeting that seeds a new conversation.
pub fn welcome_message(user: Option<&UserProfile>) -> ChatMessage {
    let name = user
        .map(|user| user.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or("there");
    let closing = if is_signed_in(user) {
        "How can I assist you today?"
    } else {
        "💡 Log in for personalized recommendations based on your progress!"
    };
    ChatMessage::bot(format!(
        "👋 Hi {name}! I'm your AI Learning Assistant. I can help you with:\n\
         \n\
         • Course recommendations\n\
         • Learning progress insights\n\
         • Study tips and guidance\n\
         • Platform navigation\n\
         \n\
         {closing}"
    ))
}

#[cfg(test)]
mod tests {
    use super::welcome_message;
    use learnchat_protocol::{Sender, UserProfile};

    #[test]
    fn welcome_greets_guests_generically() {
        let message = welcome_message(None);
        assert_eq!(message.sender, Sender::Bot);
        assert!(message.text.starts_with("👋 Hi there!"));
        assert!(message.text.ends_with("based on your progress!"));
        assert!(!message.is_error);
    }

    #[test]
    fn welcome_uses_the_signed_in_name() {
        let user = UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            ..UserProfile::default()
        };
        let message = welcome_message(Some(&user));
        assert!(message.text.starts_with("👋 Hi Ada!"));
        assert!(message.text.ends_with("How can I assist you today?"));
    }
}
