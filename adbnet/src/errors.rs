//! Error types for adbnet
//!
//! Streaming operations (command output, scan progress) never return these: their
//! failures are folded into the stream contents. Everything around them (storage,
//! settings, logging setup, argument validation) does.

use thiserror::Error;

/// Main error type for adbnet
#[derive(Error, Debug)]
pub enum AdbNetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
