use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for settings, history, exports and logs (defaults to ~/.authwatch)
    pub data_dir: Option<String>,
    /// JSON or YAML dataset; mock data is generated when unset
    pub dataset_path: Option<String>,
    /// Overrides `<data_dir>/settings.json`
    pub settings_path: Option<String>,
    /// Overrides `<data_dir>/exports`
    pub export_dir: Option<String>,
    /// Event poll timeout, also the tick interval
    pub tick_rate_ms: u64,
    /// Simulated admin API latency
    pub mock_latency_ms: u64,
    /// Probability that a simulated admin action fails
    pub mock_failure_rate: f64,
    /// Sessions generated for the mock dataset
    pub mock_dataset_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            dataset_path: None,
            settings_path: None,
            export_dir: None,
            tick_rate_ms: 100,
            mock_latency_ms: 800,
            mock_failure_rate: 0.15,
            mock_dataset_size: 40,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".authwatch"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Base directory for everything the app writes
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(Self::config_dir)
            .unwrap_or_else(|| PathBuf::from(".authwatch"))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir().join("settings.json"))
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir().join("history.json")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir().join("exports"))
    }

    pub fn dataset_file(&self) -> Option<PathBuf> {
        self.dataset_path
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "mock_latency_ms": 50 }"#).unwrap();
        assert_eq!(config.mock_latency_ms, 50);
        assert_eq!(config.tick_rate_ms, Config::default().tick_rate_ms);
        assert!(config.dataset_file().is_none());
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let config = Config {
            data_dir: Some("/tmp/aw".to_string()),
            ..Config::default()
        };
        assert_eq!(config.settings_file(), PathBuf::from("/tmp/aw/settings.json"));
        assert_eq!(config.history_file(), PathBuf::from("/tmp/aw/history.json"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/aw/exports"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config {
            data_dir: Some("/tmp/aw".to_string()),
            settings_path: Some("/etc/aw/settings.json".to_string()),
            export_dir: Some("/srv/exports".to_string()),
            dataset_path: Some("/srv/data.yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(config.settings_file(), PathBuf::from("/etc/aw/settings.json"));
        assert_eq!(config.export_dir(), PathBuf::from("/srv/exports"));
        assert_eq!(config.dataset_file(), Some(PathBuf::from("/srv/data.yaml")));
    }
}
