//! Settings store - nested settings document with path-scoped partial merges
//!
//! The document is held as a raw JSON tree so a patch can name any branch
//! without the caller building a full typed value. Reads go through
//! [`DashboardSettings::project`] to get typed values with defaults.

use super::settings::DashboardSettings;
use serde_json::{Map, Value};

/// Recursively merge `patch` into `target` in place.
///
/// Objects merge key by key; anything else (scalars, arrays, type mismatches)
/// replaces the current value outright. Keys only present in `target` are kept.
pub fn merge_into(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                merge_into(target_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, patch) => {
            *target = patch;
        }
    }
}

/// Merge `patch` into a copy of `current` and return the result.
///
/// A `null` current document is treated as an empty one.
pub fn update_settings(current: &Value, patch: &Value) -> Value {
    let mut next = if current.is_null() {
        Value::Object(Map::new())
    } else {
        current.clone()
    };
    merge_into(&mut next, patch.clone());
    next
}

/// Build the minimal patch that sets `value` at a dotted `path`.
///
/// `patch_at("thresholds.uptime.warning", 80)` yields
/// `{"thresholds": {"uptime": {"warning": 80}}}`.
pub fn patch_at(path: &str, value: Value) -> Value {
    path.rsplit('.')
        .filter(|segment| !segment.is_empty())
        .fold(value, |inner, segment| {
            let mut map = Map::new();
            map.insert(segment.to_string(), inner);
            Value::Object(map)
        })
}

/// Read the value at a dotted path
pub fn value_at<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(document, |node, segment| node.get(segment))
}

/// Holder of the live settings document
#[derive(Debug, Clone)]
pub struct SettingsStore {
    document: Value,
    typed: DashboardSettings,
    /// Document as last loaded or saved
    baseline: Value,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DashboardSettings::default_document())
    }
}

impl SettingsStore {
    /// Create a store from a loaded document. Missing namespaces are filled
    /// from the defaults, present ones keep their stored values.
    pub fn new(loaded: Value) -> Self {
        let mut document = DashboardSettings::default_document();
        if loaded.is_object() {
            merge_into(&mut document, loaded);
        }
        let (typed, fallbacks) = DashboardSettings::project(&document);
        if !fallbacks.is_empty() {
            tracing::warn!(?fallbacks, "settings namespaces fell back to defaults");
        }
        Self {
            baseline: document.clone(),
            document,
            typed,
        }
    }

    /// The raw document
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Typed view of the document
    pub fn settings(&self) -> &DashboardSettings {
        &self.typed
    }

    /// Merge a partial settings tree into the document
    pub fn update(&mut self, patch: Value) {
        merge_into(&mut self.document, patch);
        self.reproject();
    }

    /// Set a single value at a dotted path
    pub fn set(&mut self, path: &str, value: Value) {
        tracing::debug!(path, %value, "settings value changed");
        self.update(patch_at(path, value));
    }

    /// Read the value at a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        value_at(&self.document, path)
    }

    /// Replace the whole document with the defaults
    pub fn reset_to_defaults(&mut self) {
        self.document = DashboardSettings::default_document();
        self.reproject();
    }

    /// Whether the document diverged from the last loaded/saved state
    pub fn is_dirty(&self) -> bool {
        self.document != self.baseline
    }

    /// Record the current document as persisted
    pub fn mark_saved(&mut self) {
        self.baseline = self.document.clone();
    }

    fn reproject(&mut self) {
        let (typed, fallbacks) = DashboardSettings::project(&self.document);
        if !fallbacks.is_empty() {
            tracing::warn!(?fallbacks, "settings namespaces fell back to defaults");
        }
        self.typed = typed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_preserves_untouched_siblings() {
        let current = json!({
            "thresholds": {
                "uptime": { "warning": 95, "critical": 90 },
                "errorRate": { "warning": 1 }
            },
            "alerts": { "enabled": true }
        });
        let patch = json!({ "thresholds": { "uptime": { "warning": 80 } } });

        let next = update_settings(&current, &patch);

        assert_eq!(next["thresholds"]["uptime"]["warning"], json!(80));
        assert_eq!(next["thresholds"]["uptime"]["critical"], json!(90));
        assert_eq!(next["thresholds"]["errorRate"]["warning"], json!(1));
        assert_eq!(next["alerts"], current["alerts"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let current = json!({ "layout": { "density": "compact", "showDetailPanel": true } });
        let patch = json!({ "layout": { "density": "comfortable" }, "theme": { "mode": "dark" } });

        let once = update_settings(&current, &patch);
        let twice = update_settings(&once, &patch);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_false_and_zero_overwrite() {
        let current = json!({ "alerts": { "includeSnapshot": true, "escalationMinutes": 15 } });
        let patch = json!({ "alerts": { "includeSnapshot": false, "escalationMinutes": 0 } });

        let next = update_settings(&current, &patch);

        assert_eq!(next["alerts"]["includeSnapshot"], json!(false));
        assert_eq!(next["alerts"]["escalationMinutes"], json!(0));
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let current = json!({ "alerts": { "channels": ["email", "slack"] } });
        let patch = json!({ "alerts": { "channels": ["pagerduty"] } });

        let next = update_settings(&current, &patch);

        assert_eq!(next["alerts"]["channels"], json!(["pagerduty"]));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let current = json!({ "refresh": 30, "theme": { "mode": "dark" } });
        let patch = json!({ "refresh": { "enabled": false }, "theme": "light" });

        let next = update_settings(&current, &patch);

        assert_eq!(next["refresh"], json!({ "enabled": false }));
        assert_eq!(next["theme"], json!("light"));
    }

    #[test]
    fn test_merge_into_absent_namespace_creates_it() {
        let next = update_settings(&Value::Null, &json!({ "cards": { "collapsed": ["latency"] } }));
        assert_eq!(next, json!({ "cards": { "collapsed": ["latency"] } }));

        let next = update_settings(&json!({ "theme": {} }), &json!({ "exports": { "format": "csv" } }));
        assert_eq!(next["exports"]["format"], json!("csv"));
        assert_eq!(next["theme"], json!({}));
    }

    #[test]
    fn test_update_settings_does_not_mutate_input() {
        let current = json!({ "theme": { "mode": "dark" } });
        let _ = update_settings(&current, &json!({ "theme": { "mode": "light" } }));
        assert_eq!(current["theme"]["mode"], json!("dark"));
    }

    #[test]
    fn test_patch_at_builds_nested_tree() {
        assert_eq!(
            patch_at("thresholds.uptime.warning", json!(80)),
            json!({ "thresholds": { "uptime": { "warning": 80 } } })
        );
        assert_eq!(patch_at("theme", json!({})), json!({ "theme": {} }));
    }

    #[test]
    fn test_value_at_reads_nested_path() {
        let doc = json!({ "alerts": { "quietHours": { "start": "22:00" } } });
        assert_eq!(value_at(&doc, "alerts.quietHours.start"), Some(&json!("22:00")));
        assert_eq!(value_at(&doc, "alerts.missing"), None);
        assert_eq!(value_at(&doc, "alerts.quietHours.start.deeper"), None);
    }

    #[test]
    fn test_store_fills_defaults_and_keeps_loaded_values() {
        let store = SettingsStore::new(json!({ "theme": { "mode": "dark" } }));

        assert_eq!(store.settings().theme.mode, "dark");
        assert_eq!(store.settings().theme.accent, "cyan");
        assert_eq!(store.settings().refresh.interval_secs, 30);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_store_ignores_non_object_document() {
        let store = SettingsStore::new(Value::Null);
        assert_eq!(store.document(), &DashboardSettings::default_document());
    }

    #[test]
    fn test_store_set_updates_typed_view_and_dirty_flag() {
        let mut store = SettingsStore::default();
        store.set("thresholds.uptime.warning", json!(80));

        assert_eq!(store.settings().thresholds.uptime.warning, 80.0);
        assert_eq!(store.settings().thresholds.uptime.critical, 98.0);
        assert!(store.is_dirty());

        store.mark_saved();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_store_reset_to_defaults_replaces_document() {
        let mut store = SettingsStore::new(json!({ "alerts": { "enabled": false } }));
        store.reset_to_defaults();

        assert!(store.settings().alerts.enabled);
        assert_eq!(store.document(), &DashboardSettings::default_document());
    }
}
