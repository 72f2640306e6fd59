//! Typed dashboard settings schema
//!
//! The persisted document is a loose JSON tree (see `settings_store`), but the
//! rest of the app reads it through these structs so every option has a value
//! once loaded. Every struct is `#[serde(default)]`: a missing branch fills from
//! `Default`, never from scattered fallbacks at the call site.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Warning/critical pair for a monitored metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self {
            warning: 0.0,
            critical: 0.0,
        }
    }
}

/// Health level of a metric against its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Ok,
    Warning,
    Critical,
}

impl ThresholdPair {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Classify a value where higher is better (uptime, success rate)
    pub fn classify_floor(&self, value: f64) -> HealthLevel {
        if value <= self.critical {
            HealthLevel::Critical
        } else if value <= self.warning {
            HealthLevel::Warning
        } else {
            HealthLevel::Ok
        }
    }

    /// Classify a value where lower is better (error rate, latency)
    pub fn classify_ceiling(&self, value: f64) -> HealthLevel {
        if value >= self.critical {
            HealthLevel::Critical
        } else if value >= self.warning {
            HealthLevel::Warning
        } else {
            HealthLevel::Ok
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    /// "comfortable" or "compact"
    pub density: String,
    pub show_health_header: bool,
    pub show_detail_panel: bool,
    pub detail_width_percent: u16,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            density: "comfortable".to_string(),
            show_health_header: true,
            show_detail_panel: true,
            detail_width_percent: 35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub pause_while_editing: bool,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
            pause_while_editing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThresholdSettings {
    pub uptime: ThresholdPair,
    pub login_success: ThresholdPair,
    pub error_rate: ThresholdPair,
    pub latency_ms: ThresholdPair,
    pub failed_logins_per_min: ThresholdPair,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            uptime: ThresholdPair::new(99.5, 98.0),
            login_success: ThresholdPair::new(97.0, 92.0),
            error_rate: ThresholdPair::new(1.0, 5.0),
            latency_ms: ThresholdPair::new(400.0, 900.0),
            failed_logins_per_min: ThresholdPair::new(30.0, 120.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuietHours {
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: "22:00".to_string(),
            end: "07:00".to_string(),
        }
    }
}

impl QuietHours {
    /// Whether `now` falls inside the window. Windows may wrap past midnight.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        let (Ok(start), Ok(end)) = (
            NaiveTime::parse_from_str(&self.start, "%H:%M"),
            NaiveTime::parse_from_str(&self.end, "%H:%M"),
        ) else {
            return false;
        };
        if start <= end {
            now >= start && now < end
        } else {
            now >= start || now < end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertSettings {
    pub enabled: bool,
    pub channels: Vec<String>,
    pub include_snapshot: bool,
    pub escalation_minutes: u32,
    pub quiet_hours: QuietHours,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: vec!["email".to_string(), "slack".to_string()],
            include_snapshot: true,
            escalation_minutes: 15,
            quiet_hours: QuietHours::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionSettings {
    pub view_roles: Vec<String>,
    pub edit_roles: Vec<String>,
    pub allow_session_termination: bool,
    pub require_mfa_for_changes: bool,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            view_roles: vec!["admin".to_string(), "moderator".to_string()],
            edit_roles: vec!["admin".to_string()],
            allow_session_termination: true,
            require_mfa_for_changes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    /// "dark", "light" or "system"
    pub mode: String,
    pub accent: String,
    pub highlight_risk: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: "system".to_string(),
            accent: "cyan".to_string(),
            highlight_risk: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    pub format: String,
    pub include_headers: bool,
    pub delimiter: String,
    pub max_rows: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            include_headers: true,
            delimiter: ",".to_string(),
            max_rows: 10_000,
        }
    }
}

impl ExportSettings {
    /// Delimiter as a single byte, falling back to a comma
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [b] => *b,
            _ => b',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceSettings {
    pub max_rows: u64,
    pub cache_ttl_secs: u64,
    pub lazy_load: bool,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            max_rows: 500,
            cache_ttl_secs: 300,
            lazy_load: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntegrationEndpoint {
    pub enabled: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntegrationSettings {
    pub slack: IntegrationEndpoint,
    pub pagerduty: IntegrationEndpoint,
    pub webhook: IntegrationEndpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasourceSettings {
    pub primary: String,
    pub fallback: String,
    pub poll_interval_secs: u64,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            primary: "auth-events".to_string(),
            fallback: "mock".to_string(),
            poll_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardSettings {
    pub visible: Vec<String>,
    pub collapsed: Vec<String>,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            visible: vec![
                "loginSuccess".to_string(),
                "errorRate".to_string(),
                "latency".to_string(),
                "failedLogins".to_string(),
            ],
            collapsed: Vec::new(),
        }
    }
}

/// The complete typed settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSettings {
    pub layout: LayoutSettings,
    pub refresh: RefreshSettings,
    pub thresholds: ThresholdSettings,
    pub alerts: AlertSettings,
    pub permissions: PermissionSettings,
    pub theme: ThemeSettings,
    pub exports: ExportSettings,
    pub performance: PerformanceSettings,
    pub integrations: IntegrationSettings,
    pub datasources: DatasourceSettings,
    pub cards: CardSettings,
}

/// Names of all top-level namespaces, in display order
pub const NAMESPACES: [&str; 11] = [
    "layout",
    "refresh",
    "thresholds",
    "alerts",
    "permissions",
    "theme",
    "exports",
    "performance",
    "integrations",
    "datasources",
    "cards",
];

impl DashboardSettings {
    /// The defaults rendered as a JSON document
    pub fn default_document() -> Value {
        serde_json::to_value(Self::default()).unwrap_or(Value::Null)
    }

    /// Project a raw document onto the typed schema.
    ///
    /// Each namespace is decoded on its own so one malformed branch only costs
    /// that namespace its values. Returns the namespaces that fell back.
    pub fn project(document: &Value) -> (Self, Vec<&'static str>) {
        let mut settings = Self::default();
        let mut fallbacks = Vec::new();

        macro_rules! decode {
            ($field:ident, $key:literal) => {
                if let Some(branch) = document.get($key) {
                    match serde_json::from_value(branch.clone()) {
                        Ok(value) => settings.$field = value,
                        Err(_) => fallbacks.push($key),
                    }
                }
            };
        }

        decode!(layout, "layout");
        decode!(refresh, "refresh");
        decode!(thresholds, "thresholds");
        decode!(alerts, "alerts");
        decode!(permissions, "permissions");
        decode!(theme, "theme");
        decode!(exports, "exports");
        decode!(performance, "performance");
        decode!(integrations, "integrations");
        decode!(datasources, "datasources");
        decode!(cards, "cards");

        (settings, fallbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_empty_document_yields_defaults() {
        let (settings, fallbacks) = DashboardSettings::project(&json!({}));
        assert_eq!(settings, DashboardSettings::default());
        assert!(fallbacks.is_empty());
    }

    #[test]
    fn test_project_partial_branch_fills_defaults() {
        let doc = json!({ "thresholds": { "uptime": { "warning": 80 } } });
        let (settings, _) = DashboardSettings::project(&doc);

        assert_eq!(settings.thresholds.uptime.warning, 80.0);
        // Missing sibling inside the pair falls back to the struct default, not the namespace default
        assert_eq!(settings.thresholds.uptime.critical, 0.0);
        assert_eq!(
            settings.thresholds.error_rate,
            ThresholdSettings::default().error_rate
        );
    }

    #[test]
    fn test_project_malformed_namespace_falls_back() {
        let doc = json!({ "alerts": "not-an-object", "theme": { "mode": "dark" } });
        let (settings, fallbacks) = DashboardSettings::project(&doc);

        assert_eq!(fallbacks, vec!["alerts"]);
        assert_eq!(settings.alerts, AlertSettings::default());
        assert_eq!(settings.theme.mode, "dark");
    }

    #[test]
    fn test_default_document_uses_camel_case() {
        let doc = DashboardSettings::default_document();
        assert!(doc["thresholds"]["errorRate"].is_object());
        assert_eq!(doc["alerts"]["includeSnapshot"], json!(true));
        for ns in NAMESPACES {
            assert!(doc.get(ns).is_some(), "missing namespace {}", ns);
        }
    }

    #[test]
    fn test_threshold_classification() {
        let uptime = ThresholdPair::new(99.0, 95.0);
        assert_eq!(uptime.classify_floor(99.9), HealthLevel::Ok);
        assert_eq!(uptime.classify_floor(97.0), HealthLevel::Warning);
        assert_eq!(uptime.classify_floor(90.0), HealthLevel::Critical);

        let errors = ThresholdPair::new(1.0, 5.0);
        assert_eq!(errors.classify_ceiling(0.2), HealthLevel::Ok);
        assert_eq!(errors.classify_ceiling(2.0), HealthLevel::Warning);
        assert_eq!(errors.classify_ceiling(7.5), HealthLevel::Critical);
    }

    #[test]
    fn test_quiet_hours_wrap_midnight() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let mut quiet = QuietHours {
            enabled: true,
            ..QuietHours::default()
        };
        assert!(quiet.contains(at(23, 30)));
        assert!(quiet.contains(at(6, 59)));
        assert!(!quiet.contains(at(7, 0)));
        assert!(!quiet.contains(at(12, 0)));

        quiet.start = "09:00".to_string();
        quiet.end = "17:00".to_string();
        assert!(quiet.contains(at(12, 0)));
        assert!(!quiet.contains(at(23, 0)));

        quiet.enabled = false;
        assert!(!quiet.contains(at(12, 0)));
    }

    #[test]
    fn test_export_delimiter_byte() {
        let mut exports = ExportSettings::default();
        assert_eq!(exports.delimiter_byte(), b',');
        exports.delimiter = ";".to_string();
        assert_eq!(exports.delimiter_byte(), b';');
        exports.delimiter = "::".to_string();
        assert_eq!(exports.delimiter_byte(), b',');
    }
}
