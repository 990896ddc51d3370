//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::http::DEFAULT_BASE_URL;
use crate::paginate::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Whether the summary is re-fetched on a timer or only on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    #[default]
    Periodic,
    OnMount,
}

/// Whether details are fetched once and paged in memory, or re-fetched on
/// every page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsFetchMode {
    #[default]
    Once,
    PerPage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds; 0 disables the timeout.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 0,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    pub summary_policy: SummaryPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            summary_policy: SummaryPolicy::Periodic,
        }
    }
}

impl RefreshConfig {
    /// Poll period, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsConfig {
    pub page_size: usize,
    /// Row limit sent to the backend; 0 sends no limit.
    pub limit: u32,
    pub include_comments: bool,
    pub fetch_mode: DetailsFetchMode,
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            limit: 0,
            include_comments: true,
            fetch_mode: DetailsFetchMode::Once,
        }
    }
}

impl DetailsConfig {
    pub fn limit(&self) -> Option<u32> {
        (self.limit > 0).then_some(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub details: DetailsConfig,
    pub log: LogConfig,
}

impl DashConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// `<config_dir>/pennydash/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pennydash")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = DashConfig::from_toml("").unwrap();
        assert_eq!(config, DashConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.refresh.interval(), Duration::from_secs(60));
        assert_eq!(config.details.page_size, 15);
        assert!(config.details.include_comments);
        assert_eq!(config.details.limit(), None);
        assert_eq!(config.api.timeout(), None);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = DashConfig::from_toml(
            r#"
            [api]
            base_url = "http://10.0.0.2:9000"
            timeout_secs = 5

            [refresh]
            summary_policy = "on_mount"

            [details]
            limit = 200
            fetch_mode = "per_page"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.refresh.summary_policy, SummaryPolicy::OnMount);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.details.limit(), Some(200));
        assert_eq!(config.details.fetch_mode, DetailsFetchMode::PerPage);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn bad_enum_is_parse_error() {
        let err = DashConfig::from_toml("[refresh]\nsummary_policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let refresh = RefreshConfig { interval_secs: 0, ..Default::default() };
        assert_eq!(refresh.interval(), Duration::from_secs(1));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = DashConfig::default();
        config.details.page_size = 25;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(DashConfig::from_file(&path).unwrap().details.page_size, 25);
    }
}
