use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use veritas_core::{CoreSettings, DEFAULT_MIN_TEXT_LEN};
use veritas_engine::ClientSettings;

use super::LogDestination;

const BASE_URL_ENV: &str = "VERITAS_BASE_URL";

/// Client configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub min_text_len: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub job_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub history_limit: usize,
    pub data_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            job_timeout_secs: client.job_timeout.as_secs(),
            tick_interval_ms: 120,
            history_limit: CoreSettings::default().history_limit,
            data_dir: PathBuf::from("."),
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    /// Reads a RON config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(base_url) = value.filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            job_timeout: Duration::from_secs(self.job_timeout_secs),
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            min_text_len: self.min_text_len,
            history_limit: self.history_limit,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_path_yields_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.min_text_len, 50);
        assert_eq!(config.client_settings().job_timeout, Duration::from_secs(300));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("veritas.ron");
        fs::write(
            &path,
            r#"(base_url: "http://crew.internal:9000", job_timeout_secs: 60, log_destination: Both)"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://crew.internal:9000");
        assert_eq!(config.job_timeout_secs, 60);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn unreadable_or_invalid_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.ron"))).is_err());

        let path = dir.path().join("bad.ron");
        fs::write(&path, "(base_url: 42)").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn blank_base_url_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_base_url_override(Some("   ".to_string()));
        assert_eq!(config.base_url, AppConfig::default().base_url);
        config.apply_base_url_override(Some(" http://other:1 ".to_string()));
        assert_eq!(config.base_url, "http://other:1");
    }
}
