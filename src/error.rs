//! Error types for rplan
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, planner not initialized)
//! - 3: Stale data (the record behind a bar is gone or ambiguous)
//! - 4: Operation failed (data integrity, IO, serialization, locking)

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{RecordKey, RecordKind};

/// Exit codes for the rplan CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const STALE_DATA: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for rplan operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Planner not initialized: {0}")]
    NotInitialized(PathBuf),

    // Stale data (exit code 3)
    #[error("Record not found: {0}")]
    NotFound(RecordKey),

    #[error("Ambiguous key: {key} matches {matches} records")]
    AmbiguousKey { key: RecordKey, matches: usize },

    // Operation failures (exit code 4)
    #[error("Invalid range: a {kind} bar ending {end} would not start before it ends")]
    InvalidRange { kind: RecordKind, end: NaiveDate },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_) | Error::InvalidArgument(_) | Error::NotInitialized(_) => {
                exit_codes::USER_ERROR
            }

            // Stale data
            Error::NotFound(_) | Error::AmbiguousKey { .. } => exit_codes::STALE_DATA,

            // Operation failures
            Error::InvalidRange { .. }
            | Error::InvalidRecord(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Machine-readable class matching the exit code
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::STALE_DATA => "stale_data",
            _ => "operation_failed",
        }
    }

    /// What the user can do next, if anything
    pub fn hint(&self) -> Option<String> {
        let hint = match self {
            Error::NotInitialized(_) => "rplan init".to_string(),
            Error::NotFound(_) => "rplan plan (refresh the schedule and retry)".to_string(),
            Error::AmbiguousKey { key, .. } => {
                format!("rename one of the records matching {key} so project names are unique")
            }
            Error::InvalidConfig(_) => "fix .rplan.toml then retry".to_string(),
            Error::LockFailed(_) => "retry once the other writer finishes".to_string(),
            _ => return None,
        };
        Some(hint)
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotFound(key) => Some(serde_json::json!({ "key": key })),
            Error::AmbiguousKey { key, matches } => {
                Some(serde_json::json!({ "key": key, "matches": matches }))
            }
            Error::InvalidRange { kind, end } => {
                Some(serde_json::json!({ "kind": kind, "end": end }))
            }
            Error::LockFailed(path) | Error::NotInitialized(path) => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        }
    }
}

/// Result type alias for rplan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON output envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
