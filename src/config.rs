use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_STORAGE_KEY;

/// Main backend configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct CooksyConfig {
    /// Where and how the state record is kept
    #[serde(default)]
    pub storage: StorageConfig,
    /// Advisor used for suggestions, photo detection and tips
    #[serde(default = "default_advisor")]
    pub advisor: String,
}

impl Default for CooksyConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            advisor: default_advisor(),
        }
    }
}

/// Which record storage backs the persistent store
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Configuration for the persistent store
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding record files (file backend only)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Key the snapshot record is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Copy undecodable records aside before they are overwritten
    #[serde(default = "default_backup_corrupt")]
    pub backup_corrupt: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            key: default_storage_key(),
            backup_corrupt: default_backup_corrupt(),
        }
    }
}

// Default value functions
fn default_advisor() -> String {
    "canned".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".cooksy")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_backup_corrupt() -> bool {
    true
}

impl CooksyConfig {
    /// Load configuration from `cooksy.toml` and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }

    /// Load configuration from an explicit file and environment variables
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_config(Some(path))
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with COOKSY__ prefix
/// 2. The given file, or an optional cooksy.toml in the current directory
/// 3. Default values
///
/// Environment variable format: COOKSY__STORAGE__PATH
pub fn load_config(path: Option<&Path>) -> Result<CooksyConfig, ConfigError> {
    let file = match path {
        // An explicitly requested file must exist
        Some(path) => File::from(path).required(true),
        None => File::with_name("cooksy").required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("COOKSY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
