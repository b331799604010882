//! Core error types for smartsched-core.
//!
//! This module defines the error hierarchy using thiserror. The engine
//! itself only ever fails on input validation; configuration and I/O
//! variants come from the TOML-backed [`crate::storage::EngineConfig`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for smartsched-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (rejected before any computation)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
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

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range for '{field}': end ({end}) must be later than start ({start})")]
    InvalidTimeRange {
        field: String,
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// A time-of-day string that is not `HH:MM` or `HH:MM:SS`
    #[error("Malformed time for '{field}': {value:?} (expected HH:MM)")]
    MalformedTime { field: String, value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
