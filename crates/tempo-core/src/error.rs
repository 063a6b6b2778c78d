//! Core error types for tempo-core.
//!
//! Every failure in this crate is recoverable. External-service and
//! playback failures never reach these types at all: they are logged and
//! replaced with a default (see `assistant` and `audio`). What remains is
//! bookkeeping errors the caller must react to.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tempo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Shop purchase errors
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Session slot errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Home/config directory could not be prepared
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty input where text is required
    #[error("{0} must not be empty")]
    Empty(String),

    /// Day index outside Monday..Sunday
    #[error("Day {0} out of range (expected 0-6, Monday first)")]
    DayOutOfRange(u8),

    /// Time not in HH:MM form
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Nothing with this id exists
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Shop purchase errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShopError {
    #[error("Unknown item '{0}'")]
    UnknownItem(String),

    #[error("Item '{0}' is already owned")]
    AlreadyOwned(String),

    #[error("Not enough coins: item costs {cost}, balance is {balance}")]
    InsufficientCoins { cost: u32, balance: u32 },
}

/// Errors around the single active session slot.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Task '{0}' is already running; finish it first")]
    AlreadyActive(String),

    #[error("No task is running")]
    NoActiveSession,

    #[error("Task '{0}' is already completed")]
    TaskCompleted(String),
}

/// Failure talking to the estimation/assistant service.
///
/// Never surfaced to the user: callers fall back to local defaults.
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No API key configured (set {0})")]
    MissingApiKey(String),
}

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

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(err: serde_json::Error) -> Self {
        EstimateError::Malformed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
