use thiserror::Error;

use crate::registration::ValidationError;

/// Common result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type that unifies validation, transport and response-shape failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors produced by reqwest HTTP client.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    /// A form failed client-side checks before anything was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The body parsed as JSON but not into a shape we understand.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The server answered with a falsy `success` indicator.
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// Fallback catch-all with a human readable message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}
