//! TOML configuration shared by the TUI and CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::{SeriesSource, DEFAULT_ENDPOINT};
use crate::playback::{PlaybackTiming, DEFAULT_TOTAL_DURATION, MIN_STEP};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON endpoint serving the historical series.
    pub endpoint: String,
    /// Import this GISTEMP CSV instead of calling the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    /// A full playback is spread over this many milliseconds.
    pub total_duration_ms: u64,
    /// Floor for the per-year step.
    pub min_step_ms: u64,
    /// Points shown in the preview list.
    pub preview_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            csv_path: None,
            total_duration_ms: DEFAULT_TOTAL_DURATION.as_millis() as u64,
            min_step_ms: MIN_STEP.as_millis() as u64,
            preview_len: 5,
        }
    }
}

impl Config {
    /// `<config_dir>/templine/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("templine").join("config.toml"))
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an explicit file, or the default location if it exists, or defaults.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Where the series comes from: the CSV file if set, else the endpoint.
    pub fn source(&self) -> SeriesSource {
        match &self.csv_path {
            Some(path) => SeriesSource::Csv { path: path.clone() },
            None => SeriesSource::Http {
                url: self.endpoint.clone(),
            },
        }
    }

    pub fn timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            total_duration: Duration::from_millis(self.total_duration_ms),
            min_step: Duration::from_millis(self.min_step_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_timing() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.timing(), PlaybackTiming::default());
        assert_eq!(cfg.preview_len, 5);
        assert!(matches!(cfg.source(), SeriesSource::Http { .. }));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml_str("total_duration_ms = 5000\n").unwrap();
        assert_eq!(cfg.total_duration_ms, 5000);
        assert_eq!(cfg.min_step_ms, 10);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn csv_path_overrides_endpoint() {
        let cfg = Config::from_toml_str("csv_path = \"data/gistemp.csv\"\n").unwrap();
        assert_eq!(
            cfg.source(),
            SeriesSource::Csv {
                path: PathBuf::from("data/gistemp.csv")
            }
        );
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            preview_len: 3,
            ..Config::default()
        };
        let text = cfg.to_toml().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "total_duration_ms = \"soon\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/templine.toml");
        assert!(matches!(Config::load(Some(missing)), Err(ConfigError::Io { .. })));
    }
}
