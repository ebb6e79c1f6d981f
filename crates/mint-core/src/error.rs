//! Failure classification shared by the retry policy and the circuit breaker.

use std::time::Duration;
use thiserror::Error;

/// How a failed call should be treated by the resilience layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Backend or network trouble. Retried, and counted by the circuit breaker.
    Transient,

    /// The backend rejected the caller's credentials.
    ///
    /// Never retried: re-sending credentials that were refused cannot succeed.
    /// Not counted by the circuit breaker unless
    /// [`count_rejections`](crate::breaker::CircuitBreakerConfig::count_rejections)
    /// is enabled.
    Rejected,

    /// The call was abandoned by the caller (cancellation). Never retried, never counted.
    Aborted,
}

/// Errors that know how the resilience layer should treat them.
///
/// # Examples
///
/// ```rust
/// use mint_core::{Classify, FailureClass};
///
/// #[derive(Debug)]
/// enum FetchError {
///     Unauthorized,
///     Unavailable,
/// }
///
/// impl Classify for FetchError {
///     fn failure_class(&self) -> FailureClass {
///         match self {
///             FetchError::Unauthorized => FailureClass::Rejected,
///             FetchError::Unavailable => FailureClass::Transient,
///         }
///     }
/// }
///
/// assert!(FetchError::Unavailable.is_transient());
/// assert!(!FetchError::Unauthorized.is_transient());
/// ```
pub trait Classify {
    /// Classify this failure.
    fn failure_class(&self) -> FailureClass;

    /// Shorthand for `failure_class() == FailureClass::Transient`.
    fn is_transient(&self) -> bool {
        self.failure_class() == FailureClass::Transient
    }
}

/// Failures produced by the resilience layer itself rather than by the operation.
///
/// Caller error types convert from this with `From`, so retry and breaker
/// wrappers can return the caller's own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResilienceError {
    /// The circuit breaker is open; the operation was not run.
    #[error("circuit breaker is open")]
    CircuitOpen,

    /// The overall retry budget ran out before any attempt completed.
    #[error("retry budget of {0:?} exhausted before an attempt completed")]
    DeadlineExceeded(Duration),

    /// The operation was cancelled through its cancellation token.
    #[error("operation cancelled")]
    Cancelled,
}

impl Classify for ResilienceError {
    fn failure_class(&self) -> FailureClass {
        match self {
            ResilienceError::CircuitOpen | ResilienceError::DeadlineExceeded(_) => {
                FailureClass::Transient
            }
            ResilienceError::Cancelled => FailureClass::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resilience_error_classes() {
        assert!(ResilienceError::CircuitOpen.is_transient());
        assert!(ResilienceError::DeadlineExceeded(Duration::from_secs(1)).is_transient());
        assert_eq!(
            ResilienceError::Cancelled.failure_class(),
            FailureClass::Aborted
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ResilienceError::CircuitOpen.to_string(),
            "circuit breaker is open"
        );
        assert_eq!(ResilienceError::Cancelled.to_string(), "operation cancelled");
    }
}
