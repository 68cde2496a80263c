//! Widget controller behavior.

use learnchat_client::{CatalogClient, ChatError, SuggestionSource};
use learnchat_core::{
    ChatWidget, ContextRefresh, GUEST_CONTEXT, WidgetDeps, WidgetError, WidgetSettings,
};
use learnchat_protocol::{
    CHAT_HISTORY_KEY, ChatMessage, Enrollment, Sender, TOKEN_KEY, UserProfile, WidgetEvent,
};
use learnchat_store::{KeyValueStore, MemoryStore, StoreError};
use parking_lot::Mutex;
use learnchat_test_utils::{FailingStore, RecordingEventSink, ScriptedTransport, StubCatalog};
use pretty_assertions::assert_eq;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

struct Harness {
    store: Arc<MemoryStore>,
    transport: ScriptedTransport,
    events: RecordingEventSink,
    catalog: Arc<dyn CatalogClient>,
    settings: WidgetSettings,
}

impl Harness {
    fn new(transport: ScriptedTransport) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            transport,
            events: RecordingEventSink::new(),
            catalog: Arc::new(StubCatalog::new(Vec::new())),
            settings: WidgetSettings {
                typing_delay: Duration::ZERO,
                ..WidgetSettings::default()
            },
        }
    }

    fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    fn with_catalog(mut self, catalog: impl CatalogClient + 'static) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    fn widget(&self, user: Option<UserProfile>) -> ChatWidget {
        ChatWidget::new(
            self.settings.clone(),
            WidgetDeps {
                store: self.store.clone(),
                transport: Arc::new(self.transport.clone()),
                catalog: self.catalog.clone(),
                events: Arc::new(self.events.clone()),
            },
            user,
        )
    }

    fn persisted(&self) -> Option<Vec<ChatMessage>> {
        self.store
            .get(CHAT_HISTORY_KEY)
            .expect("get")
            .map(|raw| serde_json::from_str(&raw).expect("history json"))
    }
}

fn student() -> UserProfile {
    UserProfile {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        ..UserProfile::default()
    }
}

#[test]
fn starts_with_welcome_when_nothing_is_stored() {
    let harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(Some(student()));

    let messages = widget.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert!(messages[0].text.starts_with("👋 Hi Ada!"));
    assert!(!widget.is_open());
    assert_eq!(widget.context(), "");
}

#[test]
fn corrupt_history_reloads_as_single_welcome() {
    let harness = Harness::new(ScriptedTransport::new())
        .with_store(MemoryStore::with_entries([(CHAT_HISTORY_KEY, "[{not json")]));
    let messages = harness.widget(None).messages();

    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.starts_with("👋 Hi there!"));
}

#[tokio::test]
async fn history_round_trips_through_the_store() {
    let harness = Harness::new(ScriptedTransport::new().reply("Try the Rust course."));
    let widget = harness.widget(Some(student()));
    widget.set_input("Recommend something");
    widget.send_message().await.expect("send");
    let before = widget.messages();

    let reloaded = harness.widget(Some(student())).messages();
    assert_eq!(reloaded, before);
    assert_eq!(harness.persisted(), Some(before));
}

#[tokio::test]
async fn send_appends_one_user_and_one_bot_message() {
    let harness = Harness::new(ScriptedTransport::new().reply("Start with Rust Basics."));
    let widget = harness.widget(None);
    widget.refresh_context().await;
    widget.set_input("  What should I learn?  ");

    let reply = widget.send_message().await.expect("send");

    let messages = widget.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "What should I learn?");
    assert_eq!(messages[2], reply);
    assert_eq!(reply.text, "Start with Rust Basics.");
    assert!(!reply.is_error);
    assert_eq!(widget.input(), "");
    assert!(!widget.is_sending());
    assert!(!widget.is_typing());

    let requests = harness.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "What should I learn?");
    assert_eq!(requests[0].context, GUEST_CONTEXT);
    assert_eq!(harness.persisted().map(|history| history.len()), Some(3));
}

#[tokio::test]
async fn failed_exchange_appends_one_error_message() {
    let harness = Harness::new(ScriptedTransport::new().fail(ChatError::RateLimited));
    let widget = harness.widget(None);
    widget.set_input("hello");

    let reply = widget.send_message().await.expect("send");

    assert!(reply.is_error);
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(
        reply.text,
        "I'm getting a lot of questions right now. Please wait a moment 🙏"
    );
    assert_eq!(widget.messages().len(), 3);
    assert!(!widget.is_sending());
    assert!(!widget.is_typing());
    assert_eq!(harness.events.count(&WidgetEvent::SendingChanged(false)), 1);
    assert_eq!(harness.events.count(&WidgetEvent::TypingChanged(false)), 1);
}

#[tokio::test]
async fn storage_failures_do_not_abort_sending_or_clearing() {
    let harness = Harness::new(ScriptedTransport::new().reply("Still here."));
    let widget = ChatWidget::new(
        harness.settings.clone(),
        WidgetDeps {
            store: Arc::new(FailingStore::new()),
            transport: Arc::new(harness.transport.clone()),
            catalog: harness.catalog.clone(),
            events: Arc::new(harness.events.clone()),
        },
        None,
    );
    widget.set_input("are you there?");

    let reply = widget.send_message().await.expect("send despite storage failure");

    assert_eq!(reply.text, "Still here.");
    assert!(!reply.is_error);
    let messages = widget.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages
            .iter()
            .skip(1)
            .map(|message| message.sender)
            .collect::<Vec<_>>(),
        vec![Sender::User, Sender::Bot]
    );
    assert!(!widget.is_sending());

    widget.clear_chat();
    let messages = widget.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.starts_with("👋 Hi there!"));
}

/// Store that reads the widget back while persisting.
#[derive(Default)]
struct ObservingStore {
    inner: MemoryStore,
    widget: OnceLock<Weak<ChatWidget>>,
    seen_lengths: Mutex<Vec<usize>>,
}

impl ObservingStore {
    fn observe(&self) {
        if let Some(widget) = self.widget.get().and_then(Weak::upgrade) {
            self.seen_lengths.lock().push(widget.messages().len());
        }
    }
}

impl KeyValueStore for ObservingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.observe();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.observe();
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn history_is_written_without_holding_widget_state() {
    let harness = Harness::new(ScriptedTransport::new());
    let store = Arc::new(ObservingStore::default());
    let widget = Arc::new(ChatWidget::new(
        harness.settings.clone(),
        WidgetDeps {
            store: store.clone(),
            transport: Arc::new(harness.transport.clone()),
            catalog: harness.catalog.clone(),
            events: Arc::new(harness.events.clone()),
        },
        None,
    ));
    assert!(store.widget.set(Arc::downgrade(&widget)).is_ok());

    widget.set_input("hello");
    widget.send_message().await.expect("send");
    widget.clear_chat();

    assert_eq!(*store.seen_lengths.lock(), vec![2, 3, 1]);
}

#[tokio::test]
async fn blank_input_is_rejected_without_side_effects() {
    let harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(None);
    widget.set_input("   \n ");

    assert_eq!(widget.send_message().await, Err(WidgetError::EmptyInput));
    assert_eq!(widget.messages().len(), 1);
    assert!(harness.transport.requests().is_empty());
    assert!(!widget.is_sending());
    assert!(harness.events.events().is_empty());
    assert_eq!(harness.persisted(), None);
}

#[tokio::test]
async fn second_send_is_rejected_while_first_is_pending() {
    let harness = Harness::new(
        ScriptedTransport::new()
            .reply("first answer")
            .with_delay(Duration::from_millis(200)),
    );
    let widget = Arc::new(harness.widget(None));
    widget.set_input("first");

    let pending = {
        let widget = widget.clone();
        tokio::spawn(async move { widget.send_message().await })
    };
    while !widget.is_sending() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(widget.is_typing());
    assert!(widget.quick_actions().is_empty());

    widget.set_input("second");
    assert_eq!(widget.send_message().await, Err(WidgetError::SendInFlight));
    assert_eq!(widget.input(), "second");

    let reply = pending.await.expect("join").expect("send");
    assert_eq!(reply.text, "first answer");
    assert_eq!(widget.messages().len(), 3);
    assert_eq!(harness.transport.requests().len(), 1);
}

#[tokio::test]
async fn typing_delay_holds_the_reply_back() {
    let mut harness = Harness::new(ScriptedTransport::new().reply("done"));
    harness.settings.typing_delay = Duration::from_millis(150);
    let widget = Arc::new(harness.widget(None));
    widget.set_input("hi");

    let pending = {
        let widget = widget.clone();
        tokio::spawn(async move { widget.send_message().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(widget.is_typing());
    assert_eq!(widget.messages().len(), 2);

    pending.await.expect("join").expect("send");
    assert!(!widget.is_typing());
    assert_eq!(widget.messages().len(), 3);
}

#[tokio::test]
async fn clear_resets_to_fresh_welcome_and_erases_storage() {
    let harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(Some(student()));
    widget.set_input("hello");
    widget.send_message().await.expect("send");
    let original_welcome = widget.messages()[0].clone();
    assert!(harness.store.contains(CHAT_HISTORY_KEY));

    widget.clear_chat();

    let messages = widget.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert!(messages[0].text.starts_with("👋 Hi Ada!"));
    assert!(messages[0].timestamp >= original_welcome.timestamp);
    assert!(!harness.store.contains(CHAT_HISTORY_KEY));
    assert_eq!(
        harness.events.events().last(),
        Some(&WidgetEvent::ScrollToLatest)
    );
}

#[tokio::test]
async fn every_history_change_scrolls_to_latest() {
    let harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(None);
    widget.set_input("one");
    widget.send_message().await.expect("send");

    assert_eq!(harness.events.count(&WidgetEvent::ScrollToLatest), 2);
    assert_eq!(
        harness.events.count(&WidgetEvent::HistoryChanged { len: 3 }),
        1
    );
}

#[tokio::test]
async fn quick_actions_depend_on_user_and_disappear_after_first_exchange() {
    let harness = Harness::new(ScriptedTransport::new());
    let guest = harness.widget(None);
    assert_eq!(
        guest.quick_actions(),
        vec![
            "What courses are available?",
            "How does this platform work?",
            "Benefits of signing up",
        ]
    );

    let widget = harness.widget(Some(student()));
    widget.clear_chat();
    assert_eq!(
        widget.quick_actions(),
        vec!["Recommend a course", "Check my progress", "Study tips"]
    );
    assert_eq!(widget.apply_quick_action(1), Ok("Check my progress"));
    assert_eq!(widget.input(), "Check my progress");

    widget.send_message().await.expect("send");
    assert!(widget.quick_actions().is_empty());
    assert_eq!(
        widget.apply_quick_action(0),
        Err(WidgetError::QuickActionUnavailable { index: 0 })
    );
}

#[test]
fn panel_toggles_emit_only_on_change() {
    let harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(None);

    widget.open();
    widget.open();
    assert!(widget.is_open());
    assert!(!widget.toggle());
    widget.close();

    assert_eq!(
        harness.events.events(),
        vec![
            WidgetEvent::PanelToggled(true),
            WidgetEvent::PanelToggled(false),
        ]
    );
}

#[tokio::test]
async fn stale_context_rebuild_never_overwrites_newer_one() {
    let catalog = StubCatalog::new(vec![Enrollment::with_course("c1", "Rust", "Programming")])
        .with_progress("c1", 50.0)
        .with_delay(Duration::from_millis(200));
    let harness = Harness::new(ScriptedTransport::new()).with_catalog(catalog);
    let widget = Arc::new(harness.widget(None));

    let slow = {
        let widget = widget.clone();
        tokio::spawn(async move { widget.set_user(Some(student())).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(widget.set_user(None).await, ContextRefresh::Applied);

    assert_eq!(slow.await.expect("join"), ContextRefresh::Superseded);
    assert_eq!(widget.context(), GUEST_CONTEXT);
    assert_eq!(widget.user(), None);
    assert_eq!(
        harness.events.events(),
        vec![WidgetEvent::ContextUpdated { generation: 2 }]
    );
}

#[tokio::test]
async fn signed_in_context_reaches_the_transport() {
    let catalog = StubCatalog::new(vec![Enrollment::with_course("c1", "Rust", "Programming")])
        .with_progress("c1", 50.0);
    let harness = Harness::new(ScriptedTransport::new()).with_catalog(catalog);
    let widget = harness.widget(Some(student()));

    assert_eq!(widget.refresh_context().await, ContextRefresh::Applied);
    widget.set_input("How am I doing?");
    widget.send_message().await.expect("send");

    let requests = harness.transport.requests();
    assert!(requests[0].context.contains("- Rust: 50% completed"));
    assert_eq!(widget.messages().len(), 3);
}

#[tokio::test]
async fn suggestions_use_stored_token() {
    let harness = Harness::new(
        ScriptedTransport::new().with_suggestions(vec!["Quiz me".to_string()]),
    )
    .with_store(MemoryStore::with_entries([(TOKEN_KEY, "tok")]));
    let widget = harness.widget(Some(student()));

    let suggestions = widget.suggestions().await;
    assert_eq!(suggestions.source, SuggestionSource::Live);
    assert_eq!(suggestions.items, vec!["Quiz me"]);
    assert_eq!(
        harness.transport.suggestion_tokens(),
        vec![Some("tok".to_string())]
    );
}

#[tokio::test]
async fn suggestion_fallback_is_silent_unless_configured() {
    let mut harness = Harness::new(ScriptedTransport::new());
    let widget = harness.widget(None);
    assert!(widget.suggestions().await.is_fallback());
    assert!(harness.events.events().is_empty());

    harness.settings.notify_on_fallback = true;
    let widget = harness.widget(None);
    assert!(widget.suggestions().await.is_fallback());
    assert!(matches!(
        harness.events.events().as_slice(),
        [WidgetEvent::Notice(_)]
    ));
}
