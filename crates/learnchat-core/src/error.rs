//! Error types for widget operations.

use thiserror::Error;

/// Rejected widget operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// The input buffer is empty after trimming.
    #[error("message is empty")]
    EmptyInput,
    /// Another message is still being sent.
    #[error("a message is already being sent")]
    SendInFlight,
    /// No quick action is offered at this index right now.
    #[error("quick action {index} is not available")]
    QuickActionUnavailable { index: usize },
}
