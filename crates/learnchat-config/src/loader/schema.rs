//! Schema validation for learnchat JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a config value (a single layer or the merged result).
pub(super) fn validate_config_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "api", "widget", "storage", "suggestions"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("api") {
        validate_api(value, layer, "api")?;
    }
    if let Some(value) = map.get("widget") {
        validate_widget(value, layer, "widget")?;
    }
    if let Some(value) = map.get("storage") {
        validate_storage(value, layer, "storage")?;
    }
    if let Some(value) = map.get("suggestions") {
        validate_suggestions(value, layer, "suggestions")?;
    }
    Ok(())
}

/// Validate the "api" block.
fn validate_api(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["base_url", "chat_timeout_ms", "request_timeout_ms"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("base_url") {
        expect_string(value, layer, &join_path(path, "base_url"))?;
    }
    if let Some(value) = map.get("chat_timeout_ms") {
        if !value.is_null() {
            expect_u64(value, layer, &join_path(path, "chat_timeout_ms"))?;
        }
    }
    if let Some(value) = map.get("request_timeout_ms") {
        expect_u64(value, layer, &join_path(path, "request_timeout_ms"))?;
    }
    Ok(())
}

/// Validate the "widget" block.
fn validate_widget(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed = [
        "typing_delay_ms",
        "max_progress_courses",
        "quick_actions_max_messages",
    ];
    ensure_allowed_keys(map, &allowed, layer, path)?;
    for key in allowed {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "storage" block.
fn validate_storage(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["path"], layer, path)?;
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    Ok(())
}

/// Validate the "suggestions" block.
fn validate_suggestions(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["fallback", "notify_on_fallback"], layer, path)?;
    if let Some(value) = map.get("fallback") {
        validate_string_array(value, layer, &join_path(path, "fallback"))?;
    }
    if let Some(value) = map.get("notify_on_fallback") {
        if !value.is_boolean() {
            return Err(invalid_field(
                layer,
                &join_path(path, "notify_on_fallback"),
                "expected bool",
            ));
        }
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid_field(layer, path, "expected object"))
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected string")),
    }
}

/// Non-negative integers only; negative values would wrap on decode.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    if let Some(idx) = entries.iter().position(|entry| !entry.is_string()) {
        return Err(invalid_field(
            layer,
            &format!("{path}[{idx}]"),
            "expected string",
        ));
    }
    Ok(())
}

/// Reject keys the schema does not know about.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
