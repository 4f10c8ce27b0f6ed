//! Error types and exit codes for bandmark
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (including a stale marks file)
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (invalid template, unknown task or band, bad selection)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

use crate::rubric::Marks;

/// Exit codes for the bandmark binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - invalid template, unknown band, bad selection (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during bandmark operations
#[derive(Error, Debug)]
pub enum BandmarkError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("invalid template: {reason}")]
    Template { reason: String },

    #[error("index {index} is out of range for band {band} ({len} requirements)")]
    IndexOutOfRange {
        band: String,
        index: usize,
        len: usize,
    },

    #[error("requirement {index} of band {band} cannot be selected")]
    Unselectable { band: String, index: usize },

    #[error("requirement {index} of band {band} does not defer to a direct requirement")]
    Unresolved { band: String, index: usize },

    #[error("no requirement of band {band} awards {mark} marks")]
    MarkNotAwarded { band: String, mark: Marks },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("marks file is out of date: {path:?}")]
    Stale { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl BandmarkError {
    /// Create an error for a structurally invalid template
    pub fn template(reason: impl Into<String>) -> Self {
        BandmarkError::Template {
            reason: reason.into(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        BandmarkError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        BandmarkError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        BandmarkError::FailedOperation {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            BandmarkError::UnknownFormat(_)
            | BandmarkError::UsageError(_)
            | BandmarkError::InvalidValue { .. } => ExitCode::Usage,

            BandmarkError::Template { .. }
            | BandmarkError::IndexOutOfRange { .. }
            | BandmarkError::Unselectable { .. }
            | BandmarkError::Unresolved { .. }
            | BandmarkError::MarkNotAwarded { .. }
            | BandmarkError::NotFound { .. } => ExitCode::Data,

            BandmarkError::Stale { .. }
            | BandmarkError::Io(_)
            | BandmarkError::Yaml(_)
            | BandmarkError::Json(_)
            | BandmarkError::Toml(_)
            | BandmarkError::FailedOperation { .. }
            | BandmarkError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            BandmarkError::UnknownFormat(_) => "unknown_format",
            BandmarkError::UsageError(_) => "usage_error",
            BandmarkError::InvalidValue { .. } => "invalid_value",
            BandmarkError::Template { .. } => "template_error",
            BandmarkError::IndexOutOfRange { .. } => "index_out_of_range",
            BandmarkError::Unselectable { .. } => "unselectable",
            BandmarkError::Unresolved { .. } => "unresolved",
            BandmarkError::MarkNotAwarded { .. } => "mark_not_awarded",
            BandmarkError::NotFound { .. } => "not_found",
            BandmarkError::Stale { .. } => "stale",
            BandmarkError::Io(_) => "io_error",
            BandmarkError::Yaml(_) => "yaml_error",
            BandmarkError::Json(_) => "json_error",
            BandmarkError::Toml(_) => "toml_error",
            BandmarkError::FailedOperation { .. } => "failed_operation",
            BandmarkError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for bandmark operations
pub type Result<T> = std::result::Result<T, BandmarkError>;
