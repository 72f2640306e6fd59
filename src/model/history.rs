//! Data models for action history persistence

use super::admin_action::{ActionKind, ActionReport, ActionStatus};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Entries kept in the history file
pub const HISTORY_LIMIT: usize = 100;

/// A single completed admin action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionHistoryEntry {
    pub timestamp: DateTime<Local>,
    pub kind: ActionKind,
    pub endpoint: String,
    pub status: ActionStatus,
    pub summary: String,
    pub target_ids: Vec<String>,
    pub elapsed_ms: u64,
}

impl ActionHistoryEntry {
    pub fn from_report(report: &ActionReport) -> Self {
        Self {
            timestamp: Local::now(),
            kind: report.request.kind,
            endpoint: report.request.kind.endpoint().to_string(),
            status: if report.outcome.is_ok() {
                ActionStatus::Succeeded
            } else {
                ActionStatus::Failed
            },
            summary: report.summary(),
            target_ids: report.request.target_ids.clone(),
            elapsed_ms: report.elapsed_ms,
        }
    }

    pub fn status_icon(&self) -> &str {
        match self.status {
            ActionStatus::Pending => "⏳",
            ActionStatus::Succeeded => "✓",
            ActionStatus::Failed => "✗",
        }
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    pub fn formatted_duration(&self) -> String {
        let secs = self.elapsed_ms as f64 / 1000.0;
        if secs < 60.0 {
            format!("{:.1}s", secs)
        } else {
            let mins = (secs / 60.0).floor();
            format!("{}m {:.0}s", mins, secs % 60.0)
        }
    }
}

/// Wrapper for persisting action history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionHistory {
    pub entries: Vec<ActionHistoryEntry>,
}

impl ActionHistory {
    pub fn load(path: &Path) -> Vec<ActionHistoryEntry> {
        if !path.exists() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<ActionHistory>(&contents) {
            Ok(history) => history.entries,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "discarding unreadable history");
                Vec::new()
            }
        }
    }

    pub fn save(path: &Path, entries: &[ActionHistoryEntry]) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let history = ActionHistory {
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Insert newest-first and drop entries past the limit
    pub fn record(entries: &mut Vec<ActionHistoryEntry>, entry: ActionHistoryEntry) {
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::admin_action::{ActionError, ActionRequest};

    fn report(ticket: u64) -> ActionReport {
        ActionReport {
            request: ActionRequest {
                ticket,
                kind: ActionKind::RefreshTokens,
                target_ids: vec!["tok-0001".to_string()],
            },
            outcome: Err(ActionError::Unavailable),
            elapsed_ms: 75_000,
        }
    }

    #[test]
    fn test_entry_from_failed_report() {
        let entry = ActionHistoryEntry::from_report(&report(1));
        assert_eq!(entry.status, ActionStatus::Failed);
        assert_eq!(entry.endpoint, "POST /admin/tokens/refresh");
        assert_eq!(entry.status_icon(), "✗");
        assert_eq!(entry.formatted_duration(), "1m 15s");
    }

    #[test]
    fn test_record_caps_history() {
        let mut entries = Vec::new();
        for ticket in 0..(HISTORY_LIMIT as u64 + 5) {
            ActionHistory::record(&mut entries, ActionHistoryEntry::from_report(&report(ticket)));
        }
        assert_eq!(entries.len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let entries = vec![ActionHistoryEntry::from_report(&report(7))];

        ActionHistory::save(&path, &entries).unwrap();
        assert_eq!(ActionHistory::load(&path), entries);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ActionHistory::load(&dir.path().join("nope.json")).is_empty());
    }
}
