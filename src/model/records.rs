//! Record types shown in the monitoring tables

use super::view::{Column, FieldValue, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level with a High > Medium > Low ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn field(&self) -> FieldValue {
        FieldValue::Ranked {
            rank: *self as u8,
            label: self.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Active,
    Idle,
    /// Inactive/abandoned session flagged by the idle heuristic
    Ghost,
}

impl SessionType {
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Active => "active",
            SessionType::Idle => "idle",
            SessionType::Ghost => "ghost",
        }
    }
}

/// A user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub ip: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub session_type: SessionType,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub idle_minutes: u32,
    #[serde(default)]
    pub flagged: bool,
}

impl Record for Session {
    const KIND: &'static str = "Sessions";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "userId" => Some(FieldValue::Text(self.user_id.clone())),
            "userName" => Some(FieldValue::Text(self.user_name.clone())),
            "ip" => Some(FieldValue::Text(self.ip.clone())),
            "device" => self.device.clone().map(FieldValue::Text),
            "location" => self.location.clone().map(FieldValue::Text),
            "sessionType" => Some(FieldValue::Text(self.session_type.label().to_string())),
            "riskLevel" => Some(self.risk_level.field()),
            "lastActivity" => self.last_activity.map(FieldValue::Timestamp),
            "idleMinutes" => Some(FieldValue::Number(f64::from(self.idle_minutes))),
            "flagged" => Some(FieldValue::Bool(self.flagged)),
            _ => None,
        }
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "userName", title: "User", width: 16 },
            Column { key: "ip", title: "IP", width: 15 },
            Column { key: "device", title: "Device", width: 14 },
            Column { key: "location", title: "Location", width: 14 },
            Column { key: "sessionType", title: "Type", width: 7 },
            Column { key: "riskLevel", title: "Risk", width: 7 },
            Column { key: "idleMinutes", title: "Idle(m)", width: 8 },
            Column { key: "lastActivity", title: "Last activity", width: 16 },
            Column { key: "flagged", title: "Flag", width: 4 },
        ]
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["userId", "userName", "ip", "device", "location"]
    }

    fn filter_dimensions() -> &'static [&'static str] {
        &["sessionType", "riskLevel", "flagged"]
    }
}

/// Token health, ordered Healthy < Expiring < Expired < Revoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    #[default]
    Healthy,
    Expiring,
    Expired,
    Revoked,
}

impl TokenStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TokenStatus::Healthy => "healthy",
            TokenStatus::Expiring => "expiring",
            TokenStatus::Expired => "expired",
            TokenStatus::Revoked => "revoked",
        }
    }

    pub fn field(&self) -> FieldValue {
        FieldValue::Ranked {
            rank: *self as u8,
            label: self.label(),
        }
    }
}

/// Refresh-token activity for one client of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefresh {
    pub id: String,
    pub user_id: String,
    pub client: String,
    pub status: TokenStatus,
    #[serde(default)]
    pub last_refresh: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refresh_count: u32,
    /// Percentage of failed refresh attempts
    #[serde(default)]
    pub failure_rate: f64,
    pub risk_level: RiskLevel,
}

impl Record for TokenRefresh {
    const KIND: &'static str = "Tokens";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "userId" => Some(FieldValue::Text(self.user_id.clone())),
            "client" => Some(FieldValue::Text(self.client.clone())),
            "status" => Some(self.status.field()),
            "lastRefresh" => self.last_refresh.map(FieldValue::Timestamp),
            "refreshCount" => Some(FieldValue::Number(f64::from(self.refresh_count))),
            "failureRate" => Some(FieldValue::Number(self.failure_rate)),
            "riskLevel" => Some(self.risk_level.field()),
            _ => None,
        }
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "userId", title: "User", width: 12 },
            Column { key: "client", title: "Client", width: 16 },
            Column { key: "status", title: "Status", width: 9 },
            Column { key: "lastRefresh", title: "Last refresh", width: 16 },
            Column { key: "refreshCount", title: "Refreshes", width: 9 },
            Column { key: "failureRate", title: "Fail %", width: 7 },
            Column { key: "riskLevel", title: "Risk", width: 7 },
        ]
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["userId", "client", "status"]
    }

    fn filter_dimensions() -> &'static [&'static str] {
        &["status", "riskLevel", "client"]
    }
}

/// Validation outcome, ordered Valid < Warning < Invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Valid,
    Warning,
    Invalid,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Warning => "warning",
            ValidationStatus::Invalid => "invalid",
        }
    }

    pub fn field(&self) -> FieldValue {
        FieldValue::Ranked {
            rank: *self as u8,
            label: self.label(),
        }
    }
}

/// Severity of a schema finding, ordered Info < Minor < Major < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }
}

/// One column of the audit-log schema and its validation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRow {
    pub id: String,
    pub table: String,
    pub column: String,
    pub expected_type: String,
    #[serde(default)]
    pub actual_type: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    pub status: ValidationStatus,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Record for SchemaRow {
    const KIND: &'static str = "Schema";

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "table" => Some(FieldValue::Text(self.table.clone())),
            "column" => Some(FieldValue::Text(self.column.clone())),
            "expectedType" => Some(FieldValue::Text(self.expected_type.clone())),
            "actualType" => self.actual_type.clone().map(FieldValue::Text),
            "nullable" => Some(FieldValue::Bool(self.nullable)),
            "status" => Some(self.status.field()),
            "severity" => Some(FieldValue::Ranked {
                rank: self.severity as u8,
                label: self.severity.label(),
            }),
            "lastChecked" => self.last_checked.map(FieldValue::Timestamp),
            _ => None,
        }
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "table", title: "Table", width: 14 },
            Column { key: "column", title: "Column", width: 16 },
            Column { key: "expectedType", title: "Expected", width: 12 },
            Column { key: "actualType", title: "Actual", width: 12 },
            Column { key: "nullable", title: "Null", width: 4 },
            Column { key: "status", title: "Status", width: 8 },
            Column { key: "severity", title: "Severity", width: 8 },
            Column { key: "lastChecked", title: "Checked", width: 16 },
        ]
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["table", "column", "expectedType", "actualType"]
    }

    fn filter_dimensions() -> &'static [&'static str] {
        &["status", "severity", "table"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view::{apply, SortDirection, ViewState};

    fn session(id: &str, name: &str, kind: SessionType, risk: RiskLevel, idle: u32) -> Session {
        Session {
            id: id.to_string(),
            user_id: format!("u-{}", id),
            user_name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            device: None,
            location: Some("Berlin".to_string()),
            session_type: kind,
            risk_level: risk,
            last_activity: None,
            idle_minutes: idle,
            flagged: false,
        }
    }

    #[test]
    fn test_session_deserializes_camel_case() {
        let json = r#"{
            "id": "s1", "userId": "u1", "userName": "ana", "ip": "1.2.3.4",
            "sessionType": "ghost", "riskLevel": "High", "idleMinutes": 240
        }"#;
        let parsed: Session = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.session_type, SessionType::Ghost);
        assert_eq!(parsed.risk_level, RiskLevel::High);
        assert_eq!(parsed.idle_minutes, 240);
        assert!(parsed.device.is_none());
    }

    #[test]
    fn test_ghost_sessions_sorted_by_idle_time() {
        let sessions = vec![
            session("1", "ana", SessionType::Ghost, RiskLevel::Low, 90),
            session("2", "ben", SessionType::Active, RiskLevel::High, 0),
            session("3", "cai", SessionType::Ghost, RiskLevel::Medium, 600),
        ];
        let view = ViewState::new()
            .with_filter("sessionType", "ghost")
            .sorted_by("idleMinutes", SortDirection::Descending);

        let ids: Vec<&str> = apply(&sessions, &view).iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_missing_optional_field_reads_as_absent() {
        let s = session("1", "ana", SessionType::Active, RiskLevel::Low, 0);
        assert!(s.field("device").is_none());
        assert!(s.field("unknown").is_none());
    }

    #[test]
    fn test_severity_filter_matches_label() {
        let row = SchemaRow {
            id: "r1".to_string(),
            table: "audit_log".to_string(),
            column: "actor_id".to_string(),
            expected_type: "uuid".to_string(),
            actual_type: Some("text".to_string()),
            nullable: false,
            status: ValidationStatus::Invalid,
            severity: Severity::Critical,
            last_checked: None,
        };
        let rows = vec![row];
        let view = ViewState::new().with_filter("severity", "Critical");
        assert_eq!(apply(&rows, &view).len(), 1);
    }

    fn schema_row(id: &str, status: ValidationStatus) -> SchemaRow {
        SchemaRow {
            id: id.to_string(),
            table: "audit_log".to_string(),
            column: format!("col_{}", id),
            expected_type: "text".to_string(),
            actual_type: None,
            nullable: true,
            status,
            severity: Severity::Info,
            last_checked: None,
        }
    }

    fn token(id: &str, status: TokenStatus) -> TokenRefresh {
        TokenRefresh {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            client: "web".to_string(),
            status,
            last_refresh: None,
            refresh_count: 0,
            failure_rate: 0.0,
            risk_level: RiskLevel::Low,
        }
    }

    #[test]
    fn test_schema_status_sorts_by_severity_not_label() {
        let rows = vec![
            schema_row("v", ValidationStatus::Valid),
            schema_row("w", ValidationStatus::Warning),
            schema_row("i", ValidationStatus::Invalid),
        ];

        let ascending = ViewState::new().sorted_by("status", SortDirection::Ascending);
        let ids: Vec<&str> = apply(&rows, &ascending).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["v", "w", "i"]);

        let descending = ViewState::new().sorted_by("status", SortDirection::Descending);
        let ids: Vec<&str> = apply(&rows, &descending).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["i", "w", "v"]);
    }

    #[test]
    fn test_token_status_sorts_by_severity_not_label() {
        let tokens = vec![
            token("revoked", TokenStatus::Revoked),
            token("healthy", TokenStatus::Healthy),
            token("expired", TokenStatus::Expired),
            token("expiring", TokenStatus::Expiring),
        ];

        let view = ViewState::new().sorted_by("status", SortDirection::Ascending);
        let ids: Vec<&str> = apply(&tokens, &view).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["healthy", "expiring", "expired", "revoked"]);
    }

    #[test]
    fn test_status_filter_and_search_still_match_label() {
        let tokens = vec![token("a", TokenStatus::Expiring), token("b", TokenStatus::Healthy)];
        let filtered = ViewState::new().with_filter("status", "expiring");
        assert_eq!(apply(&tokens, &filtered).len(), 1);

        let searched = ViewState::new().with_search("EXPIR");
        assert_eq!(apply(&tokens, &searched).len(), 1);
    }

    #[test]
    fn test_every_column_key_resolves() {
        let s = session("1", "ana", SessionType::Active, RiskLevel::Low, 0);
        for column in Session::columns() {
            if column.key != "device" && column.key != "lastActivity" {
                assert!(s.field(column.key).is_some(), "column {} unresolved", column.key);
            }
        }
    }
}
