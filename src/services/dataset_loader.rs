//! Dataset loading
//!
//! Reads a monitoring dataset from a JSON or YAML file. When no file is
//! configured, or it cannot be read, a mock dataset is generated instead.

use crate::model::dataset::{DataSource, Dataset};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse a dataset file, choosing the format by extension
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let dataset = if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML dataset {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON dataset {}", path.display()))?
    };

    Ok(dataset)
}

/// Load the configured dataset, falling back to mock data.
///
/// A load failure is returned alongside the mock so the UI can surface it.
pub fn load_or_mock(path: Option<&Path>, mock_size: usize) -> (Dataset, DataSource, Option<String>) {
    let mock = || Dataset::mock(&mut rand::rng(), mock_size);

    let Some(path) = path else {
        return (mock(), DataSource::Mock, None);
    };

    match load_dataset(path) {
        Ok(dataset) => {
            tracing::info!(
                path = %path.display(),
                sessions = dataset.sessions.len(),
                tokens = dataset.tokens.len(),
                schema = dataset.schema.len(),
                "dataset loaded"
            );
            (dataset, DataSource::File(path.to_path_buf()), None)
        }
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "falling back to mock dataset");
            (mock(), DataSource::Mock, Some(format!("{:#}", err)))
        }
    }
}
