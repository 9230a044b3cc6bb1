//! Configuration
//!
//! Layered configuration: built-in defaults, an optional global config file,
//! then `MFS__*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::MfsError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MfsConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunker: ChunkerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where blocks and the root pointer live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Sled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Sled database directory; None means the platform data dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the sled database directory
    pub fn resolve_path(&self) -> Result<PathBuf, MfsError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(paths::data_dir()?.join("blocks")),
        }
    }
}

fn default_chunk_size() -> usize {
    262_144
}

fn default_max_links() -> usize {
    174
}

/// File chunking layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Leaf payload size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum links per file node
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_links: default_max_links(),
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<(), MfsError> {
        if self.chunk_size == 0 {
            return Err(MfsError::ConfigError(
                "chunker.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.max_links < 2 {
            return Err(MfsError::ConfigError(format!(
                "chunker.max_links must be at least 2, got {}",
                self.max_links
            )));
        }
        Ok(())
    }
}
