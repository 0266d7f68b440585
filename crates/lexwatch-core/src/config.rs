//! Monitoring configuration loaded from TOML.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How `ChangeDetection::change_type` is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTypeMode {
    /// Every record is tagged `modified`.
    #[default]
    Fixed,
    /// Records carry the categorised change type.
    Categorized,
}

/// A monitored regulatory source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub name: String,
    pub feed_url: String,
    pub download_interval_hours: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn download_interval(&self) -> Duration {
        Duration::from_secs(self.download_interval_hours * 3600)
    }
}

/// Top-level configuration for the monitoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub change_type_mode: ChangeTypeMode,
    /// Notification recipients for high-impact findings.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Webhook endpoint for notifications. Log-only delivery when absent.
    #[serde(default)]
    pub webhook_url: Option<String>,
    pub sources: Vec<SourceConfig>,
}

impl MonitorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            sources = config.sources.len(),
            "loaded monitor config"
        );
        Ok(config)
    }

    /// Sources with `enabled = true`.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }

    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no sources configured".into()));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(ConfigError::Invalid("source with empty id".into()));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source id '{}'",
                    source.id
                )));
            }
            if source.download_interval_hours == 0 {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' has a zero download interval",
                    source.id
                )));
            }
        }
        Ok(())
    }
}
