//! Layered configuration loader.
//!
//! Discovers the user and working-directory layers, appends runtime override
//! files, validates each layer against the schema, merges them, and produces
//! the effective `LearnchatConfig`.

mod layer_io;
mod schema;


use crate::{ConfigError, LearnchatConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in every layer.
const DEFAULT_CONFIG_FILE: &str = "learnchat.json5";
/// Default config directory under the home directory.
const DEFAULT_CONFIG_DIR: &str = ".learnchat";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: LearnchatConfig,
    /// Metadata for each layer that contributed to the config.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory searched for a local config file.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.learnchat/learnchat.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last, in order.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl LearnchatConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load the layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load the layered config stack using explicit locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime overrides. Missing
    /// user/cwd files are skipped; missing runtime files are an error.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let optional = [
            (ConfigLayerSource::User, options.user_config_path.clone()),
            (
                ConfigLayerSource::Cwd,
                Some(options.cwd.join(DEFAULT_CONFIG_FILE)),
            ),
        ];
        for (source, path) in optional {
            let Some(path) = path else {
                continue;
            };
            if !seen_paths.insert(layer_io::unique_path(&path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if let Some(layer) = layer_io::load_optional_layer(source, &path)? {
                merge_values(&mut merged, &layer.value);
                layers.push(layer.meta);
            }
        }

        for runtime_path in &options.runtime_paths {
            let layer = layer_io::load_required_layer(ConfigLayerSource::Runtime, runtime_path)?;
            merge_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got {base_url:?}"
            )));
        }
        if self.api.chat_timeout_ms == Some(0) || self.api.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "api timeouts must be greater than zero".to_string(),
            ));
        }
        if self.suggestions.fallback.is_empty() {
            return Err(ConfigError::Invalid(
                "suggestions.fallback must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A layer read from disk together with its raw value.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<LearnchatConfig, ConfigError> {
    schema::validate_config_schema(&value, label)?;
    let config: LearnchatConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Merge overlay values into the base; objects merge key by key, anything else replaces.
fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
