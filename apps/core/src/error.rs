use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error type for setup operations and collaborator calls.
///
/// Nothing of this type ever reaches the caller of
/// [`ChatbotCore::get_response`](crate::brain::ChatbotCore::get_response);
/// the pipeline maps every failure to a conversational reply.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors (e.g., missing API key, bad env value).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level failures talking to a remote service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The generative model answered, but not with something usable.
    #[error("LLM request failed: {0}")]
    Llm(String),

    /// Operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Data validation errors (e.g., malformed category files).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Http(err.to_string())
        }
    }
}

/// Failures loading an institution profile document.
///
/// Kept separate from [`AppError`] so callers can tell a missing file from a
/// broken one.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file does not exist.
    #[error("Institution profile not found at {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("Failed to read institution profile {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON, or its top level is not an object.
    #[error("Invalid JSON in institution profile: {0}")]
    Parse(#[from] serde_json::Error),
}
