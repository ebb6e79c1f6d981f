//! The retry strategy abstraction.

use crate::error::{Classify, FailureClass, ResilienceError};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// A strategy for re-attempting failed operations.
///
/// Implementations decide whether a failure is worth another attempt, how long
/// to wait before it, and when to give up. When they give up they return the
/// error of the last attempt, never a synthetic "gave up" error, so callers can
/// tell "failed with X repeatedly" apart from anything else.
///
/// # Examples
///
/// ```rust
/// use mint_core::retry::{BackoffStrategy, RetryPolicy};
/// use mint_core::{Classify, FailureClass, ResilienceError};
/// use std::time::Duration;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("flaky")]
/// struct Flaky;
///
/// impl Classify for Flaky {
///     fn failure_class(&self) -> FailureClass {
///         FailureClass::Transient
///     }
/// }
///
/// impl From<ResilienceError> for Flaky {
///     fn from(_: ResilienceError) -> Self {
///         Flaky
///     }
/// }
///
/// # async fn example() {
/// let policy = RetryPolicy::builder()
///     .max_attempts(2)
///     .interval(Duration::from_millis(5))
///     .build();
///
/// let result = policy.execute(|| async { Err::<(), _>(Flaky) }).await;
/// assert!(result.is_err());
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Execute an operation with retry logic.
    ///
    /// The operation is called until it succeeds, fails with an error
    /// [`should_retry`](Self::should_retry) refuses, or the strategy runs out
    /// of attempts or time.
    ///
    /// # Returns
    /// - `Ok(T)`: the first successful result
    /// - `Err(E)`: the error of the last attempt, or a [`ResilienceError`]
    ///   converted into `E` when no attempt completed
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Classify + From<ResilienceError> + Send + Sync + 'static;

    /// Decide whether a failure of the given class is worth another attempt.
    ///
    /// The default retries transient failures only. Rejected credentials and
    /// aborted calls fail immediately.
    fn should_retry(&self, class: FailureClass, attempt: u32) -> bool {
        let _ = attempt;
        class == FailureClass::Transient
    }

    /// The wait before the attempt following `attempt` (1-indexed).
    ///
    /// `None` means no further attempt should be made.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Total number of attempts, including the first one.
    fn max_attempts(&self) -> u32;
}
