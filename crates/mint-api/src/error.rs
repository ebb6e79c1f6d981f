//! Error types for the Mint client
//!
//! Every failure a client call can produce is a variant of [`Error`]. Callers
//! can tell apart the cases that need different handling:
//!
//! - [`Error::InvalidArgument`]: fix the call, nothing was sent
//! - [`Error::NotAuthorized`]: run the authorize flow again
//! - [`Error::CircuitOpen`]: the backend is considered degraded, back off
//! - everything else is a backend or network failure that survived retrying

use mint_core::{Classify, FailureClass, ResilienceError};
use mint_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a Mint client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Mint client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A caller-supplied argument is missing or malformed. Detected before any
    /// network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Credentials are absent, or the backend rejected them (401/410).
    #[error("Not authorized")]
    NotAuthorized,

    /// The backend answered with an error status or an error envelope.
    ///
    /// `code` is the HTTP status for error statuses, or the application error
    /// code for a 2xx response carrying `error_code`.
    #[error("{code} {message}")]
    Api {
        /// Status or application error code
        code: i64,
        /// Status text or application error message
        message: String,
    },

    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A 2xx response body could not be parsed, or lacked a field the client needs.
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// The circuit breaker is open; no request was sent.
    #[error("Circuit breaker is open")]
    CircuitOpen,

    /// The retry budget ran out before any attempt completed.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled through the client's cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl Error {
    /// Check if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.failure_class() == FailureClass::Transient
    }

    /// Check if the call was refused by an open circuit breaker.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Error::CircuitOpen)
    }

    /// Check if the caller needs to authorize (again).
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, Error::NotAuthorized)
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }
}

impl Classify for Error {
    fn failure_class(&self) -> FailureClass {
        match self {
            Error::Api { .. }
            | Error::Transport(_)
            | Error::Parse(_)
            | Error::CircuitOpen
            | Error::Timeout(_) => FailureClass::Transient,
            Error::NotAuthorized => FailureClass::Rejected,
            // Caller-side errors are raised before a request exists
            Error::Cancelled
            | Error::InvalidArgument(_)
            | Error::InvalidUrl(_)
            | Error::HttpClient(_) => FailureClass::Aborted,
        }
    }
}

impl From<ResilienceError> for Error {
    fn from(err: ResilienceError) -> Self {
        match err {
            ResilienceError::CircuitOpen => Error::CircuitOpen,
            ResilienceError::DeadlineExceeded(timeout) => Error::Timeout(timeout),
            ResilienceError::Cancelled => Error::Cancelled,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}
