//! Static option tables used by the settings editor and the mock dataset

/// Alert delivery channels
pub const ALERT_CHANNELS: [&str; 5] = ["email", "slack", "pagerduty", "sms", "webhook"];

/// Admin roles that can be granted view/edit access
pub const ROLES: [&str; 5] = ["admin", "moderator", "support", "analyst", "auditor"];

/// Health cards that can be shown in the header
pub const CARD_IDS: [&str; 5] = [
    "uptime",
    "loginSuccess",
    "errorRate",
    "latency",
    "failedLogins",
];

pub const THEME_MODES: [&str; 3] = ["system", "dark", "light"];

pub const ACCENTS: [&str; 5] = ["cyan", "green", "magenta", "yellow", "blue"];

pub const DENSITIES: [&str; 2] = ["comfortable", "compact"];

pub const EXPORT_FORMATS: [&str; 2] = ["csv", "json"];

pub const DATASOURCES: [&str; 4] = ["auth-events", "session-store", "audit-log", "mock"];

pub(crate) const USER_NAMES: [&str; 12] = [
    "ana.silva",
    "ben.okafor",
    "chen.wei",
    "dara.kim",
    "eli.novak",
    "fatima.h",
    "gus.muller",
    "hana.sato",
    "ivan.petrov",
    "jules.martin",
    "kofi.mensah",
    "lena.berg",
];

pub(crate) const DEVICES: [&str; 6] = [
    "Chrome/macOS",
    "Safari/iOS",
    "Firefox/Linux",
    "Edge/Windows",
    "App/Android",
    "App/iOS",
];

pub(crate) const LOCATIONS: [&str; 7] = [
    "Berlin",
    "Lagos",
    "Sao Paulo",
    "Seoul",
    "Toronto",
    "Mumbai",
    "Unknown VPN",
];

pub(crate) const CLIENTS: [&str; 5] = ["web", "ios-app", "android-app", "partner-api", "cli"];

/// (table, column, expected type) rows checked by the audit schema validator
pub(crate) const SCHEMA_COLUMNS: [(&str, &str, &str); 12] = [
    ("audit_log", "id", "uuid"),
    ("audit_log", "actor_id", "uuid"),
    ("audit_log", "action", "text"),
    ("audit_log", "created_at", "timestamptz"),
    ("audit_log", "metadata", "jsonb"),
    ("sessions", "id", "uuid"),
    ("sessions", "user_id", "uuid"),
    ("sessions", "last_seen", "timestamptz"),
    ("sessions", "ip", "inet"),
    ("refresh_tokens", "token_hash", "bytea"),
    ("refresh_tokens", "expires_at", "timestamptz"),
    ("refresh_tokens", "revoked", "boolean"),
];
