//! Core error types for focusflow-core.
//!
//! This module defines the error hierarchy using thiserror. The tracking
//! loop itself recovers from almost everything; these types cover the
//! boundaries that genuinely fail (storage, configuration, the remote
//! generation call, and permission state at loop start).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracking lifecycle errors
    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    /// Remote text-generation errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Session-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create the data directory
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the remote text-generation call.
///
/// Every variant is recovered by [`crate::MessageProvider`] via the fixed
/// fallback text; callers outside the provider only see these in tests or
/// when using [`crate::TextGenerationClient`] directly.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Transport failure (includes timeouts)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("Generation API returned HTTP {status}")]
    Http { status: u16 },

    /// Response body did not match the expected shape
    #[error("Failed to parse generation response: {0}")]
    Parse(String),

    /// Response parsed but contained no usable text
    #[error("Generation response contained no text")]
    EmptyResponse,
}

/// Tracking lifecycle errors.
#[derive(Error, Debug)]
pub enum TrackingError {
    /// Usage access has not been granted; the loop did not start.
    #[error("Usage access permission is not granted")]
    PermissionDenied,

    /// The loop has been shut down and cannot be started again.
    #[error("Tracking loop has been shut down")]
    ShutDown,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}
