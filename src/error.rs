//! Error types for storage and filesystem operations.

use thiserror::Error;

/// Errors raised by block and root pointer storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sled::Error),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Failed to encode node: {0}")]
    EncodeError(String),

    #[error("Corrupt block {hash}: {reason}")]
    CorruptBlock { hash: String, reason: String },

    #[error("Invalid hash: {0}")]
    InvalidHash(String),
}

/// Errors surfaced by the MFS operation surface
///
/// `NotFound` always renders as "<path> does not exist"; callers match on that phrase.
#[derive(Debug, Error)]
pub enum MfsError {
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for MfsError {
    fn from(err: config::ConfigError) -> Self {
        MfsError::ConfigError(err.to_string())
    }
}

impl MfsError {
    /// True when the error is a missing path, i.e. the message contains "does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, MfsError::NotFound(_))
    }
}
