//! Storage backend selection

use serde::Deserialize;
use std::path::PathBuf;

use super::database::DatabaseConfig;
use super::error::ValidationError;

/// Which document store backs the session
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding collection files (file backend)
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Connection settings (postgres backend)
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::File => {
                if self.path.as_os_str().is_empty() {
                    return Err(ValidationError::EmptyStoragePath);
                }
                Ok(())
            }
            StorageBackend::Postgres => self.database.validate(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            database: DatabaseConfig::default(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data")
}
