//! Export of selected records
//!
//! Writes the selection as CSV (or JSON) according to the `exports` settings
//! namespace. Columns are the record id followed by the table columns.

use crate::model::settings::ExportSettings;
use crate::model::view::Record;
use anyhow::{bail, Context, Result};
use chrono::Local;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn header_keys<R: Record>() -> Vec<&'static str> {
    std::iter::once("id")
        .chain(R::columns().iter().map(|c| c.key))
        .collect()
}

fn cell<R: Record>(record: &R, key: &str) -> String {
    record.field(key).map(|v| v.to_string()).unwrap_or_default()
}

/// First path in `dir` named `<stem>.<ext>`, `<stem>-2.<ext>`, ... that is not taken
fn unused_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let mut path = dir.join(format!("{}.{}", stem, extension));
    let mut n = 2;
    while path.exists() {
        path = dir.join(format!("{}-{}.{}", stem, n, extension));
        n += 1;
    }
    path
}

/// Write records as CSV, returning the number of data rows written
pub fn write_csv<R: Record, W: Write>(
    writer: W,
    records: &[&R],
    settings: &ExportSettings,
) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(settings.delimiter_byte())
        .from_writer(writer);

    let keys = header_keys::<R>();
    if settings.include_headers {
        csv_writer.write_record(&keys)?;
    }

    let limit = settings.max_rows as usize;
    let mut written = 0;
    for record in records.iter().take(limit) {
        csv_writer.write_record(keys.iter().map(|k| cell(*record, k)))?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Records as a JSON array of objects keyed by field
pub fn to_json<R: Record>(records: &[&R], settings: &ExportSettings) -> Value {
    let keys = header_keys::<R>();
    let rows = records
        .iter()
        .take(settings.max_rows as usize)
        .map(|record| {
            let mut row = Map::new();
            for key in &keys {
                let value = record
                    .field(key)
                    .map(|v| Value::from(v.to_string()))
                    .unwrap_or(Value::Null);
                row.insert((*key).to_string(), value);
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

/// Write an export file into `dir` and return its path
pub fn export_records<R: Record>(
    records: &[&R],
    settings: &ExportSettings,
    dir: &Path,
) -> Result<PathBuf> {
    if records.is_empty() {
        bail!("Nothing selected to export");
    }

    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let extension = if settings.format.eq_ignore_ascii_case("json") {
        "json"
    } else {
        "csv"
    };
    let stem = format!(
        "{}-{}",
        R::KIND.to_lowercase(),
        Local::now().format("%Y%m%d-%H%M%S-%3f")
    );
    let path = unused_path(dir, &stem, extension);

    let rows = if extension == "json" {
        let json = serde_json::to_string_pretty(&to_json(records, settings))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        records.len().min(settings.max_rows as usize)
    } else {
        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(file, records, settings)?
    };

    tracing::info!(path = %path.display(), rows, kind = R::KIND, "exported records");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::{RiskLevel, Session, SessionType};

    fn session(id: &str, name: &str, location: Option<&str>) -> Session {
        Session {
            id: id.to_string(),
            user_id: format!("u-{}", id),
            user_name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            device: None,
            location: location.map(str::to_string),
            session_type: SessionType::Idle,
            risk_level: RiskLevel::Medium,
            last_activity: None,
            idle_minutes: 20,
            flagged: false,
        }
    }

    fn csv_string(records: &[&Session], settings: &ExportSettings) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, records, settings).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_with_headers_and_custom_delimiter() {
        let a = session("s1", "ana", Some("Berlin"));
        let settings = ExportSettings {
            delimiter: ";".to_string(),
            ..ExportSettings::default()
        };

        let out = csv_string(&[&a], &settings);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("id;userName;ip;device;location;sessionType;riskLevel;idleMinutes;lastActivity;flagged")
        );
        assert_eq!(lines.next(), Some("s1;ana;10.0.0.1;;Berlin;idle;Medium;20;;no"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_without_headers_respects_max_rows() {
        let a = session("s1", "ana", None);
        let b = session("s2", "ben", None);
        let settings = ExportSettings {
            include_headers: false,
            max_rows: 1,
            ..ExportSettings::default()
        };

        let out = csv_string(&[&a, &b], &settings);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("s1,"));
    }

    #[test]
    fn test_json_export_uses_null_for_missing_fields() {
        let a = session("s1", "ana", None);
        let json = to_json(&[&a], &ExportSettings::default());
        assert_eq!(json[0]["location"], Value::Null);
        assert_eq!(json[0]["userName"], Value::from("ana"));
    }

    #[test]
    fn test_export_records_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = session("s1", "ana", None);

        let path = export_records(&[&a], &ExportSettings::default(), dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_back_to_back_exports_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = session("s1", "ana", None);
        let b = session("s2", "ben", None);

        let first = export_records(&[&a], &ExportSettings::default(), dir.path()).unwrap();
        let second = export_records(&[&a, &b], &ExportSettings::default(), dir.path()).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap().lines().count(), 2);
        assert_eq!(fs::read_to_string(second).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_unused_path_adds_counter_when_taken() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sessions-x.csv"), "").unwrap();
        fs::write(dir.path().join("sessions-x-2.csv"), "").unwrap();

        assert_eq!(
            unused_path(dir.path(), "sessions-x", "csv"),
            dir.path().join("sessions-x-3.csv")
        );
        assert_eq!(
            unused_path(dir.path(), "sessions-y", "csv"),
            dir.path().join("sessions-y.csv")
        );
    }

    #[test]
    fn test_export_nothing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let empty: Vec<&Session> = Vec::new();
        assert!(export_records(&empty, &ExportSettings::default(), dir.path()).is_err());
    }
}
