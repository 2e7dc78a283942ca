//! Configuration System
//!
//! Layered configuration for the stackstate binary: built-in defaults, a
//! global file, workspace files, then environment variables.

use crate::error::QueryError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackStateConfig {
    /// Store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sled database directory; relative paths resolve against the workspace root
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".stackstate/store")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl StorageConfig {
    pub fn resolve_store_path(&self, workspace_root: &Path) -> PathBuf {
        if self.store_path.is_absolute() {
            self.store_path.clone()
        } else {
            workspace_root.join(&self.store_path)
        }
    }
}

impl StackStateConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.storage.store_path.as_os_str().is_empty() {
            return Err(QueryError::Config("Store path cannot be empty".to_string()));
        }
        if !["json", "text"].contains(&self.logging.format.as_str()) {
            return Err(QueryError::Config(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, QueryError> {
        toml::to_string_pretty(self).map_err(|e| QueryError::Config(e.to_string()))
    }
}
