//! Monitoring dataset and its mock generator
//!
//! A dataset file can be supplied through the config; otherwise a mock
//! dataset is fabricated so the console is usable without a backend.

use super::admin_action::{ActionKind, ActionReport};
use super::catalog::{CLIENTS, DEVICES, LOCATIONS, SCHEMA_COLUMNS, USER_NAMES};
use super::records::{
    RiskLevel, SchemaRow, Session, SessionType, Severity, TokenRefresh, TokenStatus,
    ValidationStatus,
};
use super::settings::{HealthLevel, ThresholdSettings};
use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// All record collections shown by the console
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub tokens: Vec<TokenRefresh>,
    #[serde(default)]
    pub schema: Vec<SchemaRow>,
}

/// Where the records on screen came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    File(PathBuf),
    #[default]
    Mock,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Mock => write!(f, "mock data"),
        }
    }
}

/// Idle minutes past which a session counts as a ghost
pub const GHOST_IDLE_MINUTES: u32 = 180;

fn risk_for(rng: &mut impl Rng) -> RiskLevel {
    match rng.random_range(0..10) {
        0..=5 => RiskLevel::Low,
        6..=8 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

impl Dataset {
    /// Fabricate a dataset of roughly `size` sessions
    pub fn mock(rng: &mut impl Rng, size: usize) -> Self {
        let now = Utc::now();

        let sessions = (0..size)
            .map(|i| {
                let idle_minutes = match rng.random_range(0..4) {
                    0 => rng.random_range(GHOST_IDLE_MINUTES..GHOST_IDLE_MINUTES * 8),
                    1 => rng.random_range(15..GHOST_IDLE_MINUTES),
                    _ => rng.random_range(0..15),
                };
                let session_type = if idle_minutes >= GHOST_IDLE_MINUTES {
                    SessionType::Ghost
                } else if idle_minutes >= 15 {
                    SessionType::Idle
                } else {
                    SessionType::Active
                };
                let name = USER_NAMES.choose(rng).copied().unwrap_or("user");
                Session {
                    id: format!("sess-{:04}", i + 1),
                    user_id: format!("u-{:03}", rng.random_range(1..400)),
                    user_name: name.to_string(),
                    ip: format!(
                        "{}.{}.{}.{}",
                        rng.random_range(10..223),
                        rng.random_range(0..255),
                        rng.random_range(0..255),
                        rng.random_range(1..255)
                    ),
                    device: DEVICES.choose(rng).map(|d| d.to_string()),
                    location: if rng.random_bool(0.9) {
                        LOCATIONS.choose(rng).map(|l| l.to_string())
                    } else {
                        None
                    },
                    session_type,
                    risk_level: risk_for(rng),
                    last_activity: Some(now - Duration::minutes(i64::from(idle_minutes))),
                    idle_minutes,
                    flagged: false,
                }
            })
            .collect();

        let tokens = (0..size / 2)
            .map(|i| {
                let status = match rng.random_range(0..12) {
                    0 => TokenStatus::Revoked,
                    1..=2 => TokenStatus::Expired,
                    3..=4 => TokenStatus::Expiring,
                    _ => TokenStatus::Healthy,
                };
                TokenRefresh {
                    id: format!("tok-{:04}", i + 1),
                    user_id: format!("u-{:03}", rng.random_range(1..400)),
                    client: CLIENTS.choose(rng).copied().unwrap_or("web").to_string(),
                    status,
                    last_refresh: Some(now - Duration::minutes(rng.random_range(1..2_880))),
                    refresh_count: rng.random_range(1..500),
                    failure_rate: (rng.random_range(0.0..12.0_f64) * 100.0).round() / 100.0,
                    risk_level: risk_for(rng),
                }
            })
            .collect();

        let schema = SCHEMA_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, (table, column, expected))| {
                let (status, severity, actual) = match rng.random_range(0..10) {
                    0 => (ValidationStatus::Invalid, Severity::Critical, Some("text")),
                    1 => (ValidationStatus::Invalid, Severity::Major, None),
                    2..=3 => (ValidationStatus::Warning, Severity::Minor, Some(*expected)),
                    _ => (ValidationStatus::Valid, Severity::Info, Some(*expected)),
                };
                SchemaRow {
                    id: format!("col-{:03}", i + 1),
                    table: table.to_string(),
                    column: column.to_string(),
                    expected_type: expected.to_string(),
                    actual_type: actual.map(str::to_string),
                    nullable: rng.random_bool(0.3),
                    status,
                    severity,
                    last_checked: Some(now - Duration::minutes(rng.random_range(1..720))),
                }
            })
            .collect();

        Self {
            sessions,
            tokens,
            schema,
        }
    }

    /// Ids of sessions the reaper would remove
    pub fn ghost_session_ids(&self) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Ghost)
            .map(|s| s.id.clone())
            .collect()
    }

    /// Ids of high-risk sessions not yet flagged
    pub fn unflagged_high_risk_ids(&self) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|s| s.risk_level == RiskLevel::High && !s.flagged)
            .map(|s| s.id.clone())
            .collect()
    }

    /// Apply the effect of a completed action to the records it touched.
    ///
    /// Only ids that went through are changed. Returns how many records changed.
    pub fn apply_report(&mut self, report: &ActionReport) -> usize {
        let applied = report.applied_ids();
        if applied.is_empty() {
            return 0;
        }
        let hit = |id: &str| applied.iter().any(|a| a == id);
        let now = Utc::now();

        match report.request.kind {
            ActionKind::ReapGhostSessions | ActionKind::TerminateSessions => {
                let before = self.sessions.len();
                self.sessions.retain(|s| !hit(&s.id));
                before - self.sessions.len()
            }
            ActionKind::AutoFlagHighRisk => {
                let mut changed = 0;
                for session in self.sessions.iter_mut().filter(|s| hit(&s.id)) {
                    session.flagged = true;
                    changed += 1;
                }
                changed
            }
            ActionKind::RefreshTokens => {
                let mut changed = 0;
                for token in self.tokens.iter_mut().filter(|t| hit(&t.id)) {
                    token.status = TokenStatus::Healthy;
                    token.last_refresh = Some(now);
                    token.refresh_count += 1;
                    changed += 1;
                }
                changed
            }
            ActionKind::RevalidateSchema => {
                let mut changed = 0;
                for row in self.schema.iter_mut().filter(|r| hit(&r.id)) {
                    row.last_checked = Some(now);
                    changed += 1;
                }
                changed
            }
        }
    }
}

/// Authentication health metrics shown in the header cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSnapshot {
    pub uptime: f64,
    pub login_success: f64,
    pub error_rate: f64,
    pub latency_ms: f64,
    pub failed_logins_per_min: f64,
}

impl HealthSnapshot {
    /// Random metrics around healthy values with occasional spikes
    pub fn mock(rng: &mut impl Rng) -> Self {
        let spike = rng.random_bool(0.15);
        Self {
            uptime: if spike { rng.random_range(96.0..99.0) } else { rng.random_range(99.3..100.0) },
            login_success: rng.random_range(90.0..99.9),
            error_rate: if spike { rng.random_range(2.0..8.0) } else { rng.random_range(0.0..1.5) },
            latency_ms: rng.random_range(120.0..1_100.0),
            failed_logins_per_min: rng.random_range(0.0..150.0),
        }
    }

    /// Each metric as (card id, label, display value, health level)
    pub fn cards(
        &self,
        thresholds: &ThresholdSettings,
    ) -> Vec<(&'static str, &'static str, String, HealthLevel)> {
        vec![
            (
                "uptime",
                "Uptime",
                format!("{:.2}%", self.uptime),
                thresholds.uptime.classify_floor(self.uptime),
            ),
            (
                "loginSuccess",
                "Login success",
                format!("{:.1}%", self.login_success),
                thresholds.login_success.classify_floor(self.login_success),
            ),
            (
                "errorRate",
                "Error rate",
                format!("{:.2}%", self.error_rate),
                thresholds.error_rate.classify_ceiling(self.error_rate),
            ),
            (
                "latency",
                "p95 latency",
                format!("{:.0} ms", self.latency_ms),
                thresholds.latency_ms.classify_ceiling(self.latency_ms),
            ),
            (
                "failedLogins",
                "Failed logins/min",
                format!("{:.0}", self.failed_logins_per_min),
                thresholds
                    .failed_logins_per_min
                    .classify_ceiling(self.failed_logins_per_min),
            ),
        ]
    }

    /// Labels of cards that are critical now but were not in `previous`
    pub fn newly_critical(
        &self,
        previous: &HealthSnapshot,
        thresholds: &ThresholdSettings,
    ) -> Vec<&'static str> {
        let before = previous.cards(thresholds);
        self.cards(thresholds)
            .into_iter()
            .zip(before)
            .filter(|((_, _, _, now), (_, _, _, was))| {
                *now == HealthLevel::Critical && *was != HealthLevel::Critical
            })
            .map(|((_, label, _, _), _)| label)
            .collect()
    }
}
