//! Editable settings fields
//!
//! Each field names a dotted path in the settings document and how it is
//! edited. Edits are turned into path-scoped patches; the store does the merge.
//! Range and format checks live here, not in the store.

use super::catalog::{
    ACCENTS, ALERT_CHANNELS, CARD_IDS, DATASOURCES, DENSITIES, EXPORT_FORMATS, ROLES, THEME_MODES,
};
use super::settings_store::{patch_at, value_at};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://[A-Za-z0-9.-]+(:\d+)?(/\S*)?$").unwrap());

/// Format constraint for free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// 24h `HH:MM`
    Time,
    /// https URL, empty allowed
    Url,
    /// Single character
    Delimiter,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Toggle,
    /// `integer` fields decode into unsigned integers and reject fractions
    Number { min: f64, max: f64, step: f64, integer: bool },
    Choice(&'static [&'static str]),
    /// Array of values drawn from a fixed option set
    MultiChoice(&'static [&'static str]),
    Text(TextFormat),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingField {
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn toggle(path: &'static str, label: &'static str) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::Toggle,
    }
}

const fn number(path: &'static str, label: &'static str, min: f64, max: f64, step: f64) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::Number { min, max, step, integer: false },
    }
}

const fn integer(path: &'static str, label: &'static str, min: f64, max: f64, step: f64) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::Number { min, max, step, integer: true },
    }
}

const fn choice(path: &'static str, label: &'static str, options: &'static [&'static str]) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::Choice(options),
    }
}

const fn multi(path: &'static str, label: &'static str, options: &'static [&'static str]) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::MultiChoice(options),
    }
}

const fn text(path: &'static str, label: &'static str, format: TextFormat) -> SettingField {
    SettingField {
        path,
        label,
        kind: FieldKind::Text(format),
    }
}

/// Every editable field, grouped by namespace
pub static SETTING_FIELDS: &[SettingField] = &[
    choice("layout.density", "Density", &DENSITIES),
    toggle("layout.showHealthHeader", "Show health header"),
    toggle("layout.showDetailPanel", "Show detail panel"),
    integer("layout.detailWidthPercent", "Detail width %", 20.0, 60.0, 5.0),
    toggle("refresh.enabled", "Auto refresh"),
    integer("refresh.intervalSecs", "Refresh interval (s)", 5.0, 600.0, 5.0),
    toggle("refresh.pauseWhileEditing", "Pause while editing"),
    number("thresholds.uptime.warning", "Uptime warning %", 50.0, 100.0, 0.1),
    number("thresholds.uptime.critical", "Uptime critical %", 50.0, 100.0, 0.1),
    number("thresholds.loginSuccess.warning", "Login success warning %", 50.0, 100.0, 0.5),
    number("thresholds.loginSuccess.critical", "Login success critical %", 50.0, 100.0, 0.5),
    number("thresholds.errorRate.warning", "Error rate warning %", 0.0, 100.0, 0.5),
    number("thresholds.errorRate.critical", "Error rate critical %", 0.0, 100.0, 0.5),
    number("thresholds.latencyMs.warning", "Latency warning (ms)", 0.0, 10_000.0, 50.0),
    number("thresholds.latencyMs.critical", "Latency critical (ms)", 0.0, 10_000.0, 50.0),
    number("thresholds.failedLoginsPerMin.warning", "Failed logins warning", 0.0, 10_000.0, 5.0),
    number("thresholds.failedLoginsPerMin.critical", "Failed logins critical", 0.0, 10_000.0, 5.0),
    toggle("alerts.enabled", "Alerts enabled"),
    multi("alerts.channels", "Alert channels", &ALERT_CHANNELS),
    toggle("alerts.includeSnapshot", "Include snapshot"),
    integer("alerts.escalationMinutes", "Escalation (min)", 0.0, 1_440.0, 5.0),
    toggle("alerts.quietHours.enabled", "Quiet hours"),
    text("alerts.quietHours.start", "Quiet hours start", TextFormat::Time),
    text("alerts.quietHours.end", "Quiet hours end", TextFormat::Time),
    multi("permissions.viewRoles", "View roles", &ROLES),
    multi("permissions.editRoles", "Edit roles", &ROLES),
    toggle("permissions.allowSessionTermination", "Allow session termination"),
    toggle("permissions.requireMfaForChanges", "Require MFA for changes"),
    choice("theme.mode", "Theme", &THEME_MODES),
    choice("theme.accent", "Accent", &ACCENTS),
    toggle("theme.highlightRisk", "Highlight risk"),
    choice("exports.format", "Export format", &EXPORT_FORMATS),
    toggle("exports.includeHeaders", "Include headers"),
    text("exports.delimiter", "CSV delimiter", TextFormat::Delimiter),
    integer("exports.maxRows", "Export row limit", 1.0, 1_000_000.0, 1_000.0),
    integer("performance.maxRows", "Table row limit", 50.0, 100_000.0, 50.0),
    integer("performance.cacheTtlSecs", "Cache TTL (s)", 0.0, 86_400.0, 30.0),
    toggle("performance.lazyLoad", "Lazy load"),
    toggle("integrations.slack.enabled", "Slack"),
    text("integrations.slack.url", "Slack webhook", TextFormat::Url),
    toggle("integrations.pagerduty.enabled", "PagerDuty"),
    text("integrations.pagerduty.url", "PagerDuty endpoint", TextFormat::Url),
    toggle("integrations.webhook.enabled", "Webhook"),
    text("integrations.webhook.url", "Webhook URL", TextFormat::Url),
    choice("datasources.primary", "Primary source", &DATASOURCES),
    choice("datasources.fallback", "Fallback source", &DATASOURCES),
    integer("datasources.pollIntervalSecs", "Poll interval (s)", 5.0, 3_600.0, 5.0),
    multi("cards.visible", "Visible cards", &CARD_IDS),
    multi("cards.collapsed", "Collapsed cards", &CARD_IDS),
];

fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        // Keep one decimal of step precision without float noise
        Value::from((n * 100.0).round() / 100.0)
    }
}

impl SettingField {
    /// Namespace this field belongs to
    pub fn namespace(&self) -> &'static str {
        self.path.split('.').next().unwrap_or(self.path)
    }

    /// Current value rendered for display
    pub fn display(&self, document: &Value) -> String {
        match value_at(document, self.path) {
            None | Some(Value::Null) => "—".to_string(),
            Some(Value::Bool(b)) => (if *b { "on" } else { "off" }).to_string(),
            Some(Value::String(s)) if s.is_empty() => "(empty)".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) if items.is_empty() => "(none)".to_string(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
        }
    }

    /// Current value as editable text, the starting buffer of the input dialog
    pub fn input_text(&self, document: &Value) -> String {
        match value_at(document, self.path) {
            None | Some(Value::Null) => String::new(),
            Some(Value::Bool(b)) => (if *b { "on" } else { "off" }).to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
        }
    }

    /// Patch flipping a toggle field
    pub fn toggle_patch(&self, document: &Value) -> Option<Value> {
        if self.kind != FieldKind::Toggle {
            return None;
        }
        let current = value_at(document, self.path)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Some(patch_at(self.path, Value::Bool(!current)))
    }

    /// Patch stepping a number by `direction` steps or cycling a choice
    pub fn step_patch(&self, document: &Value, direction: i32) -> Option<Value> {
        match self.kind {
            FieldKind::Number { min, max, step, integer } => {
                let current = value_at(document, self.path)
                    .and_then(Value::as_f64)
                    .unwrap_or(min);
                let mut next = (current + step * f64::from(direction)).clamp(min, max);
                if integer {
                    next = next.round();
                }
                Some(patch_at(self.path, json_number(next)))
            }
            FieldKind::Choice(options) if !options.is_empty() => {
                let current = value_at(document, self.path).and_then(Value::as_str);
                let idx = current
                    .and_then(|c| options.iter().position(|o| *o == c))
                    .unwrap_or(0) as i32;
                let len = options.len() as i32;
                let next = (idx + direction).rem_euclid(len) as usize;
                Some(patch_at(self.path, Value::from(options[next])))
            }
            _ => None,
        }
    }

    /// Validate typed input and turn it into a patch
    pub fn parse_input(&self, input: &str) -> Result<Value, String> {
        let input = input.trim();
        let value = match self.kind {
            FieldKind::Toggle => match input.to_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => Value::Bool(true),
                "off" | "false" | "no" | "0" => Value::Bool(false),
                _ => return Err(format!("{}: expected on/off", self.label)),
            },
            FieldKind::Number { min, max, integer, .. } => {
                let n: f64 = input
                    .parse()
                    .map_err(|_| format!("{}: '{}' is not a number", self.label, input))?;
                if integer && n.fract() != 0.0 {
                    return Err(format!("{}: expected a whole number", self.label));
                }
                if !(min..=max).contains(&n) {
                    return Err(format!("{}: must be between {} and {}", self.label, min, max));
                }
                json_number(n)
            }
            FieldKind::Choice(options) => {
                let found = options
                    .iter()
                    .find(|o| o.eq_ignore_ascii_case(input))
                    .ok_or_else(|| format!("{}: choose one of {}", self.label, options.join(", ")))?;
                Value::from(*found)
            }
            FieldKind::MultiChoice(options) => {
                let mut picked: Vec<Value> = Vec::new();
                for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let found = options
                        .iter()
                        .find(|o| o.eq_ignore_ascii_case(item))
                        .ok_or_else(|| format!("{}: unknown option '{}'", self.label, item))?;
                    let value = Value::from(*found);
                    if !picked.contains(&value) {
                        picked.push(value);
                    }
                }
                Value::Array(picked)
            }
            FieldKind::Text(TextFormat::Time) => {
                if !TIME_REGEX.is_match(input) {
                    return Err(format!("{}: expected HH:MM", self.label));
                }
                Value::from(input)
            }
            FieldKind::Text(TextFormat::Url) => {
                if !input.is_empty() && !URL_REGEX.is_match(input) {
                    return Err(format!("{}: expected an https:// URL", self.label));
                }
                Value::from(input)
            }
            FieldKind::Text(TextFormat::Delimiter) => {
                if input.len() != 1 || !input.is_ascii() {
                    return Err(format!("{}: expected a single ASCII character", self.label));
                }
                Value::from(input)
            }
        };
        Ok(patch_at(self.path, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::DashboardSettings;
    use crate::model::settings_store::{update_settings, SettingsStore};
    use serde_json::json;

    fn field(path: &str) -> &'static SettingField {
        SETTING_FIELDS.iter().find(|f| f.path == path).unwrap()
    }

    #[test]
    fn test_every_field_path_exists_in_defaults() {
        let doc = DashboardSettings::default_document();
        for f in SETTING_FIELDS {
            assert!(value_at(&doc, f.path).is_some(), "{} missing from defaults", f.path);
        }
    }

    #[test]
    fn test_toggle_patch_flips_to_false() {
        let doc = json!({ "alerts": { "includeSnapshot": true, "enabled": true } });
        let patch = field("alerts.includeSnapshot").toggle_patch(&doc).unwrap();
        let next = update_settings(&doc, &patch);

        assert_eq!(next["alerts"]["includeSnapshot"], json!(false));
        assert_eq!(next["alerts"]["enabled"], json!(true));
    }

    #[test]
    fn test_step_patch_clamps_numbers() {
        let doc = json!({ "refresh": { "intervalSecs": 600 } });
        let up = field("refresh.intervalSecs").step_patch(&doc, 1).unwrap();
        assert_eq!(up, json!({ "refresh": { "intervalSecs": 600 } }));

        let down = field("refresh.intervalSecs").step_patch(&doc, -1).unwrap();
        assert_eq!(down, json!({ "refresh": { "intervalSecs": 595 } }));
    }

    #[test]
    fn test_step_patch_fractional_step() {
        let doc = json!({ "thresholds": { "uptime": { "warning": 99.5 } } });
        let patch = field("thresholds.uptime.warning").step_patch(&doc, 1).unwrap();
        assert_eq!(patch["thresholds"]["uptime"]["warning"], json!(99.6));
    }

    #[test]
    fn test_step_patch_cycles_choices() {
        let doc = json!({ "theme": { "mode": "light" } });
        let patch = field("theme.mode").step_patch(&doc, 1).unwrap();
        assert_eq!(patch, json!({ "theme": { "mode": "system" } }));
    }

    #[test]
    fn test_parse_input_validates_time() {
        let start = field("alerts.quietHours.start");
        assert_eq!(
            start.parse_input("23:30").unwrap(),
            json!({ "alerts": { "quietHours": { "start": "23:30" } } })
        );
        assert!(start.parse_input("24:00").is_err());
        assert!(start.parse_input("7pm").is_err());
    }

    #[test]
    fn test_parse_input_validates_url() {
        let url = field("integrations.slack.url");
        assert!(url.parse_input("https://hooks.example.com/T000/B000").is_ok());
        assert!(url.parse_input("").is_ok());
        assert!(url.parse_input("http://insecure.example.com").is_err());
    }

    #[test]
    fn test_parse_input_number_range() {
        let escalation = field("alerts.escalationMinutes");
        assert_eq!(
            escalation.parse_input("0").unwrap(),
            json!({ "alerts": { "escalationMinutes": 0 } })
        );
        assert!(escalation.parse_input("-5").is_err());
        assert!(escalation.parse_input("abc").is_err());
    }

    #[test]
    fn test_parse_input_rejects_fraction_for_whole_number_field() {
        let mut store = SettingsStore::default();
        store.set("alerts.channels", json!(["pagerduty"]));
        store.set("alerts.enabled", json!(false));

        let escalation = field("alerts.escalationMinutes");
        assert!(escalation.parse_input("12.5").is_err());
        store.update(escalation.parse_input("12.0").unwrap());

        let alerts = &store.settings().alerts;
        assert_eq!(alerts.escalation_minutes, 12);
        assert_eq!(alerts.channels, vec!["pagerduty"]);
        assert!(!alerts.enabled);
    }

    #[test]
    fn test_fractional_thresholds_still_accepted() {
        let warning = field("thresholds.uptime.warning");
        assert_eq!(
            warning.parse_input("99.5").unwrap(),
            json!({ "thresholds": { "uptime": { "warning": 99.5 } } })
        );
    }

    #[test]
    fn test_step_patch_keeps_whole_number_fields_integral() {
        let doc = json!({ "alerts": { "escalationMinutes": 12.5 } });
        let patch = field("alerts.escalationMinutes").step_patch(&doc, 1).unwrap();
        assert_eq!(patch, json!({ "alerts": { "escalationMinutes": 18 } }));
    }

    #[test]
    fn test_parse_input_delimiter_must_be_one_ascii_byte() {
        let delimiter = field("exports.delimiter");
        assert_eq!(
            delimiter.parse_input(";").unwrap(),
            json!({ "exports": { "delimiter": ";" } })
        );
        assert!(delimiter.parse_input("§").is_err());
        assert!(delimiter.parse_input(";;").is_err());
    }

    #[test]
    fn test_parse_input_multi_choice_replaces_array() {
        let mut store = SettingsStore::default();
        let channels = field("alerts.channels");
        store.update(channels.parse_input("PagerDuty, sms, sms").unwrap());

        assert_eq!(store.settings().alerts.channels, vec!["pagerduty", "sms"]);
        assert!(channels.parse_input("carrier-pigeon").is_err());
    }

    #[test]
    fn test_display_formats_values() {
        let doc = json!({
            "alerts": { "enabled": false, "channels": ["email", "slack"] },
            "integrations": { "slack": { "url": "" } }
        });
        assert_eq!(field("alerts.enabled").display(&doc), "off");
        assert_eq!(field("alerts.channels").display(&doc), "email, slack");
        assert_eq!(field("integrations.slack.url").display(&doc), "(empty)");
        assert_eq!(field("theme.mode").display(&doc), "—");
    }

    #[test]
    fn test_input_text_round_trips_through_parse() {
        let doc = DashboardSettings::default_document();
        for f in SETTING_FIELDS.iter() {
            let text = f.input_text(&doc);
            let patch = f.parse_input(&text);
            assert!(patch.is_ok(), "{} rejected its own value '{}'", f.path, text);
            let merged = update_settings(&doc, &patch.unwrap());
            assert_eq!(DashboardSettings::project(&merged).0, DashboardSettings::default(), "{}", f.path);
        }
    }

    #[test]
    fn test_namespace_of_field() {
        assert_eq!(field("alerts.quietHours.end").namespace(), "alerts");
    }
}
