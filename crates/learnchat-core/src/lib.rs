//! Chat widget controller and personalization context for learnchat.

pub mod context;
pub mod error;
pub mod events;
pub mod format;
pub mod widget;

pub use context::{ContextBuilder, GUEST_CONTEXT, minimal_context};
pub use error::WidgetError;
pub use events::EventBus;
pub use format::{format_time, format_time_in};
pub use widget::{ChatWidget, ContextRefresh, WidgetDeps, WidgetSettings, welcome_message};
