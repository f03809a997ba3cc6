//! Error types and exit codes for poemario
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, generator, serialization)
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (bad date, duplicate entry, malformed archive)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the poemario CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - bad date, duplicate entry, malformed archive (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during poemario operations
#[derive(Error, Debug)]
pub enum PoemarioError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("document not found: {path:?}")]
    DocumentNotFound { path: PathBuf },

    #[error("no content under '# {label}'")]
    MissingSection { label: String },

    #[error("invalid or missing date: '{value}' (expected YYYY-MM-DD; name the file YYYY-MM-DD.txt or add 'FECHA: YYYY-MM-DD' at the top)")]
    InvalidDate { value: String },

    #[error("archive already has an entry for date={date}")]
    DuplicateDate { date: String },

    #[error("invalid archive {path:?}: {reason}")]
    InvalidArchive { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("keyword generation failed: {reason}")]
    Generation { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl PoemarioError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PoemarioError::UnknownFormat(_) | PoemarioError::UsageError(_) => ExitCode::Usage,

            PoemarioError::DocumentNotFound { .. }
            | PoemarioError::MissingSection { .. }
            | PoemarioError::InvalidDate { .. }
            | PoemarioError::DuplicateDate { .. }
            | PoemarioError::InvalidArchive { .. } => ExitCode::Data,

            PoemarioError::Generation { .. }
            | PoemarioError::Io(_)
            | PoemarioError::Json(_)
            | PoemarioError::Toml(_)
            | PoemarioError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            PoemarioError::UnknownFormat(_) => "unknown_format",
            PoemarioError::UsageError(_) => "usage_error",
            PoemarioError::DocumentNotFound { .. } => "document_not_found",
            PoemarioError::MissingSection { .. } => "missing_section",
            PoemarioError::InvalidDate { .. } => "invalid_date",
            PoemarioError::DuplicateDate { .. } => "duplicate_date",
            PoemarioError::InvalidArchive { .. } => "invalid_archive",
            PoemarioError::Generation { .. } => "generation_failed",
            PoemarioError::Io(_) => "io_error",
            PoemarioError::Json(_) => "json_error",
            PoemarioError::Toml(_) => "toml_error",
            PoemarioError::Other(_) => "other",
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

/// Result type alias for poemario operations
pub type Result<T> = std::result::Result<T, PoemarioError>;
