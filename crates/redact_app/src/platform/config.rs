//! Host configuration, read from a RON file.
//!
//! Every field has a default, so a missing file or a partial file both work.
//! The inference API key is never part of this file; it comes from the
//! `API_KEY` environment variable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use redact_core::{RedactionInputs, RedactionMethod, TargetSelection, CATEGORY_UNIVERSE};
use redact_engine::{
    EngineSettings, SecretString, DEFAULT_BACKEND_URL, DEFAULT_INFERENCE_ENDPOINT,
    DEFAULT_MAX_RESPONSE_BYTES,
};
use redact_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "redact.ron";
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub inference_endpoint: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
    /// How long the host waits for outstanding requests before giving up.
    /// Unset means wait until every request completes.
    pub settle_timeout_secs: Option<u64>,
    /// `terminal`, `file` or `both`.
    pub log_destination: String,
    pub log_level: String,
    pub method: String,
    pub blur_ksize: String,
    pub mosaic_scale: String,
    /// Categories sent in the `query` field. Backends that match plural
    /// labels need `"faces"` here instead of `"face"`.
    pub targets: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let inputs = RedactionInputs::default();
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            settle_timeout_secs: None,
            log_destination: "terminal".to_string(),
            log_level: "info".to_string(),
            method: inputs.method.as_str().to_string(),
            blur_ksize: inputs.blur,
            mosaic_scale: inputs.mosaic,
            targets: CATEGORY_UNIVERSE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn engine_settings(&self, api_key: SecretString) -> EngineSettings {
        EngineSettings {
            inference_endpoint: self.inference_endpoint.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_response_bytes: self.max_response_bytes,
            ..EngineSettings::new(self.backend_url.clone(), api_key)
        }
    }

    /// Unknown method names fall back to blur.
    pub fn inputs(&self) -> RedactionInputs {
        RedactionInputs {
            method: RedactionMethod::from_name(&self.method).unwrap_or_default(),
            blur: self.blur_ksize.clone(),
            mosaic: self.mosaic_scale.clone(),
        }
    }

    pub fn targets(&self) -> TargetSelection {
        self.targets.iter().map(String::as_str).collect()
    }

    pub fn settle_timeout(&self) -> Option<Duration> {
        self.settle_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_destination(&self) -> LogDestination {
        LogDestination::from_name(&self.log_destination).unwrap_or_default()
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use redact_core::RedactionMethod;
    use redact_engine::SecretString;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError};

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.targets().len(), 4);
        assert_eq!(config.inputs().blur, "151");
        assert_eq!(config.settle_timeout(), None);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("redact.ron");
        std::fs::write(
            &path,
            r#"(
                backend_url: "http://localhost:9000",
                request_timeout_secs: Some(30),
                settle_timeout_secs: Some(90),
                method: "pixelate",
                targets: ["faces"],
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.backend_url, "http://localhost:9000");
        assert_eq!(config.inputs().method, RedactionMethod::Pixelate);
        assert_eq!(config.inputs().mosaic, "0.06");
        assert_eq!(config.targets().labels().collect::<Vec<_>>(), vec!["faces"]);
        assert_eq!(config.settle_timeout(), Some(Duration::from_secs(90)));

        let settings = config.engine_settings(SecretString::new("k".to_string()));
        assert_eq!(settings.backend_url, "http://localhost:9000");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.connect_timeout, None);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("redact.ron");
        std::fs::write(&path, "(backend_url: 42").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_names_fall_back() {
        let config = AppConfig {
            method: "smear".to_string(),
            log_destination: "syslog".to_string(),
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.inputs().method, RedactionMethod::Blur);
        assert_eq!(config.log_destination(), redact_logging::LogDestination::Terminal);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }
}
