// src/config.rs
use crate::core::alphabet::Alphabet;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ASSET_ROOT: &str = "images";
pub const DEFAULT_ASSET_EXTENSION: &str = "png";
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Settings for a conversion session, read from a JSON file.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Root of the sign image tree: `<asset_root>/<en|ar>/<KEY>.<ext>`.
    pub asset_root: PathBuf,
    pub asset_extension: String,
    /// A probe that has not settled by then falls back to text.
    pub probe_timeout_ms: u64,
    pub default_alphabet: Alphabet,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            asset_extension: DEFAULT_ASSET_EXTENSION.to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            default_alphabet: Alphabet::Latin,
        }
    }
}

impl SessionConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if one is given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "probe_timeout_ms must be greater than zero".to_string(),
            ));
        }
        let ext = self.asset_extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "asset_extension {:?} is not a valid file extension",
                self.asset_extension
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(r#"{ "default_alphabet": "ar" }"#);
        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.default_alphabet, Alphabet::Arabic);
        assert_eq!(config.asset_root, PathBuf::from("images"));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = write_config(r#"{ "probe_timeout_ms": 0 }"#);
        let err = SessionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = SessionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(SessionConfig::load_or_default(None).unwrap(), SessionConfig::default());
    }
}
