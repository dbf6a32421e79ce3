//! Error types and exit codes for scigrade
//!
//! Exit codes:
//! - 0: Success (including a raw, unparsed model reply)
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, empty answer)
//! - 3: Configuration error (no credential, bad config file values)
//! - 4: Transport error (the request never completed)

mod macros;

use std::time::Duration;

use thiserror::Error;

/// Exit codes for the scigrade binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Configuration error - missing credential (3)
    Configuration = 3,
    /// Transport error - endpoint unreachable or rejected the request (4)
    Transport = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during scigrade operations
#[derive(Error, Debug)]
pub enum ScigradeError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("unknown subject: {0} (expected: Biology, Physics, or Chemistry)")]
    UnknownSubject(String),

    #[error("Please enter an answer to evaluate.")]
    EmptyAnswer,

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Configuration errors (exit code 3)
    #[error("no API credential configured: set {env_var} in the environment or in {secrets}")]
    MissingCredential { env_var: String, secrets: String },

    // Transport errors (exit code 4)
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("request to {url} timed out after {}s", timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    #[error("endpoint returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed completion envelope: {0}")]
    MalformedEnvelope(String),

    // Generic failures (exit code 1)
    #[error("an evaluation is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl ScigradeError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ScigradeError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Map a reqwest failure onto the transport error class
    pub fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScigradeError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_decode() {
            ScigradeError::MalformedEnvelope(err.to_string())
        } else {
            ScigradeError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// True when the request never produced a usable completion
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScigradeError::Transport { .. }
                | ScigradeError::Timeout { .. }
                | ScigradeError::HttpStatus { .. }
                | ScigradeError::MalformedEnvelope(_)
        )
    }

    /// True when the failure comes from missing or invalid configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScigradeError::MissingCredential { .. })
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ScigradeError::UnknownFormat(_)
            | ScigradeError::UnknownSubject(_)
            | ScigradeError::EmptyAnswer
            | ScigradeError::UsageError(_)
            | ScigradeError::InvalidValue { .. } => ExitCode::Usage,

            ScigradeError::MissingCredential { .. } => ExitCode::Configuration,

            ScigradeError::Transport { .. }
            | ScigradeError::Timeout { .. }
            | ScigradeError::HttpStatus { .. }
            | ScigradeError::MalformedEnvelope(_) => ExitCode::Transport,

            ScigradeError::Busy
            | ScigradeError::Io(_)
            | ScigradeError::Json(_)
            | ScigradeError::Toml(_)
            | ScigradeError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            ScigradeError::UnknownFormat(_) => "unknown_format",
            ScigradeError::UnknownSubject(_) => "unknown_subject",
            ScigradeError::EmptyAnswer => "empty_answer",
            ScigradeError::UsageError(_) => "usage_error",
            ScigradeError::InvalidValue { .. } => "invalid_value",
            ScigradeError::MissingCredential { .. } => "configuration_error",
            ScigradeError::Transport { .. } => "transport_error",
            ScigradeError::Timeout { .. } => "timeout",
            ScigradeError::HttpStatus { .. } => "http_status",
            ScigradeError::MalformedEnvelope(_) => "malformed_envelope",
            ScigradeError::Busy => "busy",
            ScigradeError::Io(_) => "io_error",
            ScigradeError::Json(_) => "json_error",
            ScigradeError::Toml(_) => "toml_error",
            ScigradeError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
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

/// Result type alias for scigrade operations
pub type Result<T> = std::result::Result<T, ScigradeError>;
