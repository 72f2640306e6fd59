//! Settings document persistence
//!
//! The document is stored as pretty-printed JSON. Loading is forgiving: a
//! missing or unreadable file yields `Value::Null`, which the store treats as
//! "use defaults".

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read the settings document, or `Null` when there is nothing usable
pub fn load_settings(path: &Path) -> Value {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no settings file, using defaults");
        return Value::Null;
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read settings file");
            return Value::Null;
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(document) if document.is_object() => document,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "settings file is not a JSON object, ignoring");
            Value::Null
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not parse settings file");
            Value::Null
        }
    }
}

/// Write the settings document, creating parent directories as needed
pub fn save_settings(path: &Path, document: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}
