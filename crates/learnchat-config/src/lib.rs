//! Configuration model and layered JSON5 loading for learnchat.
//!
//! Layers are read from the user's home directory, the working directory and
//! explicit runtime override files, merged in that order, validated, and
//! decoded into a [`LearnchatConfig`].

mod error;
mod loader;
mod model;

/// Error type returned by config loading and validation.
pub use error::ConfigError;
/// Layer metadata and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
