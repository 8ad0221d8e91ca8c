//! Errors raised by the remote tuning API layer and the command-line tool.
//!
//! The estimators themselves never fail; they degrade to documented defaults.

/// Errors that can occur while talking to the tuning service.
#[derive(Debug, thiserror::Error)]
pub enum ArcheryError {
    /// The request could not be sent or the connection failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not what the endpoint promises.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service reported a failure inside a successful response.
    #[error("Remote calculation failed: {0}")]
    Remote(String),

    /// The tuning service was switched off for this run.
    #[error("Tuning service disabled")]
    Offline,

    /// Caller supplied values that cannot be sent or parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<String> for ArcheryError {
    fn from(msg: String) -> Self {
        ArcheryError::InvalidInput(msg)
    }
}

impl From<&str> for ArcheryError {
    fn from(msg: &str) -> Self {
        ArcheryError::InvalidInput(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArcheryError>;
