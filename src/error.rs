//! Error types for stack version state aggregation.

use crate::types::ClusterVersionId;
use thiserror::Error;

/// Storage-related errors raised by store backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Conflicting record: {0}")]
    Conflict(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors surfaced to callers of the query service.
///
/// Every variant is terminal for the call that raised it.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("There is no stack version with id {0}")]
    NotFound(ClusterVersionId),

    #[error("Method not supported: {0}")]
    UnsupportedOperation(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for QueryError {
    fn from(err: config::ConfigError) -> Self {
        QueryError::Config(err.to_string())
    }
}
