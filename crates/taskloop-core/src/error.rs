//! Core error types for taskloop-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Badge classifier errors
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to resolve or create the data directory
    #[error("Failed to prepare data directory: {0}")]
    DataDirFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored state fails validation
    #[error("Corrupt stored state: {0}")]
    Corrupt(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Failed to resolve the configuration file path
    #[error("Failed to resolve configuration path: {0}")]
    PathFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Badge classifier errors.
///
/// Callers treat every variant as "no badge"; none of these abort a
/// completion that has already been recorded.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// No API key stored for the classifier backend
    #[error("Classifier API key not configured")]
    MissingApiKey,

    /// Keyring access failed
    #[error("Keyring error: {0}")]
    Credential(String),

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status from the backend
    #[error("Classifier returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response carried no choices
    #[error("Classifier response contained no choices")]
    EmptyResponse,

    /// Choice content was not a valid verdict
    #[error("Malformed classifier verdict: {0}")]
    MalformedVerdict(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Task name is empty or whitespace
    #[error("Task name must not be empty")]
    EmptyTaskName,

    /// Reminder time string could not be parsed
    #[error("Invalid reminder time '{0}': expected HH:MM")]
    InvalidReminderTime(String),

    /// Unrecognized frequency string
    #[error("Invalid frequency '{0}': expected daily, weekly, mon-wed-fri, or every-3-hours")]
    InvalidFrequency(String),

    /// Rule badge with a zero threshold would be earned immediately
    #[error("Badge '{badge}' has a zero threshold")]
    ZeroThreshold { badge: String },

    /// Two catalog badges share an id
    #[error("Duplicate badge id '{0}' in catalog")]
    DuplicateBadge(String),

    /// Username fails the character rules
    #[error("Invalid username '{0}': use letters, digits, '-' or '_'")]
    InvalidUsername(String),

    /// Referenced task does not exist
    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
