// File: src/config.rs
use crate::core::replacements::ReplacementTable;
use crate::errors::ConfigError;
use crate::persistence::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "language-decoder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one dictionary document per identity.
    pub storage_root: PathBuf,
    /// Identity whose dictionaries are loaded.
    pub identity: String,
    pub source_language: String,
    pub target_language: String,
    /// Replacement table used when the identity has none stored yet.
    pub replacements: ReplacementTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            identity: uuid::Uuid::new_v4().to_string(),
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            replacements: ReplacementTable::default(),
        }
    }
}

impl Config {
    /// Reads a JSON config file. A missing file is created with the
    /// defaults, so the generated identity is stable across runs.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = Self::default();
                let data = serde_json::to_string_pretty(&config)?;
                write_atomic(path, data.as_bytes()).map_err(io_error)?;
                tracing::info!(path = %path.display(), identity = %config.identity, "wrote default config");
                Ok(config)
            }
            Err(source) => Err(io_error(source)),
        }
    }
}

fn default_storage_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("dicts"))
        .unwrap_or_else(|| PathBuf::from("dicts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decoder.json");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.target_language, "en");
        assert!(uuid::Uuid::parse_str(&config.identity).is_ok());

        let again = Config::load(&path).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"identity": "me", "target_language": "de"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.identity, "me");
        assert_eq!(config.target_language, "de");
        assert_eq!(config.source_language, "auto");
        assert_eq!(config.replacements, ReplacementTable::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
    }
}
