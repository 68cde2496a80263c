//! Public SDK surface for learnchat.
//!
//! This crate re-exports the building blocks of the chat widget and provides
//! small initialization helpers to keep consumer setup consistent.

/// Re-export for convenience.
pub use learnchat_client as client;
/// Re-export for convenience.
pub use learnchat_config as config;
pub use learnchat_core as core;
/// Re-export for convenience.
pub use learnchat_protocol as protocol;
/// Re-export for convenience.
pub use learnchat_store as store;

use log::error;
use std::panic;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// Timestamps carry milliseconds and `RUST_LOG` is honored. This is a no-op
/// if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

/// Report panics through the `log` facade before the default hook runs.
///
/// Call after [`init_logging`] so the report reaches the configured logger.
pub fn install_panic_reporter() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("panic (location={location}): {}", panic_message(info.payload()));
        default_hook(info);
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::panic_message;
    use pretty_assertions::assert_eq;

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("owned boom")), "owned boom");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }
}
