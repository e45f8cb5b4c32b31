//! File-based configuration loading

use crate::error::{SitegenError, SitegenResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a configuration file as a JSON value for layering
///
/// Supports JSON, TOML and YAML based on the file extension. A missing file
/// yields `None` so optional config paths can be passed unconditionally.
pub fn load_value_from_file(path: &Path) -> SitegenResult<Option<Value>> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, skipping", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        SitegenError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let value: Value = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            SitegenError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            SitegenError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            SitegenError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    if !value.is_object() {
        return Err(SitegenError::config_with_context(
            "Configuration root must be a table/object",
            path.display().to_string(),
        ));
    }

    Ok(Some(value))
}

/// Recursively overlay `overlay` onto `base`; objects merge, everything else replaces
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
