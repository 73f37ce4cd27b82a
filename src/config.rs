//! Store configuration.
//!
//! Where the database lives and how it is named. Values come from an
//! optional TOML file overlaid by `STOWAGE`-prefixed environment
//! variables, with documented defaults underneath.

use crate::error::StoreError;
use crate::logging::LoggingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default database name, used as the final path component.
pub const DEFAULT_DATABASE: &str = "stowage";

/// Configuration for a store instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the database files; `None` resolves to the
    /// platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Database name (default: `"stowage"`).
    #[serde(default = "default_database")]
    pub database: String,

    /// Keep the database entirely in memory. Intended for tests; nothing
    /// is persisted across connections.
    #[serde(default)]
    pub temporary: bool,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database: default_database(),
            temporary: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file (if present) with environment
    /// overlay. Precedence: defaults (lowest) -> file -> environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("STOWAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Filesystem location of the database: `data_dir` joined with the
    /// database name, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf, StoreError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.join(&self.database));
        }
        let project_dirs = directories::ProjectDirs::from("", "stowage", "stowage")
            .ok_or_else(|| {
                StoreError::Config(
                    "could not determine platform data directory for the database".to_string(),
                )
            })?;
        Ok(project_dirs.data_dir().join(&self.database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.database, "stowage");
        assert_eq!(config.data_dir, None);
        assert!(!config.temporary);
    }

    #[test]
    fn test_database_path_uses_data_dir() {
        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/var/lib/stowage")),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/var/lib/stowage/stowage")
        );
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = StoreConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.database, "stowage");
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("stowage.toml");
        std::fs::write(&path, "database = \"userdata\"\ntemporary = true\n").unwrap();
        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.database, "userdata");
        assert!(config.temporary);
    }
}
