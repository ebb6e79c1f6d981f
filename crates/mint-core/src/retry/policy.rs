//! Fixed-interval retry bounded by attempts and an overall timeout.

use super::strategy::BackoffStrategy;
use crate::error::{Classify, ResilienceError};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const DEFAULT_MAX_ATTEMPTS: u32 = 2;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(24);

/// Retry policy with a fixed wait between attempts.
///
/// Retrying stops at whichever bound is hit first:
///
/// - `max_attempts` total attempts (the first one included)
/// - `timeout`, measured from the start of the first attempt
///
/// The wait between attempts is always `interval`; it does not grow. A wait
/// that would end at or after the deadline is not started. An attempt still in
/// flight when the deadline passes is dropped.
///
/// # Examples
///
/// ```rust
/// use mint_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// // Defaults: 2 attempts, 3s apart, 24s overall
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.interval(), Duration::from_secs(3));
///
/// let fast = RetryPolicy::builder()
///     .max_attempts(5)
///     .interval(Duration::from_millis(100))
///     .timeout(Duration::from_secs(2))
///     .build();
/// assert_eq!(fast.timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
    timeout: Duration,
}

impl RetryPolicy {
    /// Create a new builder for configuring the policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Wait between two attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Overall budget measured from the first attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Like [`execute`](BackoffStrategy::execute), but abandons the in-flight
    /// attempt or the pending wait as soon as `cancel` fires.
    ///
    /// A cancelled call returns [`ResilienceError::Cancelled`] converted into `E`.
    pub async fn execute_cancellable<F, Fut, T, E>(
        &self,
        operation: F,
        cancel: &CancellationToken,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + From<ResilienceError>,
    {
        self.run(operation, Some(cancel)).await
    }

    async fn run<F, Fut, T, E>(&self, operation: F, cancel: Option<&CancellationToken>) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + From<ResilienceError>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last_error: Option<E> = None;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancelled(cancel) => return Err(ResilienceError::Cancelled.into()),
                outcome = tokio::time::timeout_at(deadline, operation()) => outcome,
            };

            let err = match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => err,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempt, timeout = ?self.timeout, "Retry budget exhausted during attempt");

                    return Err(last_error
                        .unwrap_or_else(|| ResilienceError::DeadlineExceeded(self.timeout).into()));
                }
            };

            if !self.should_retry(err.failure_class(), attempt) {
                return Err(err);
            }
            let Some(delay) = self.next_delay(attempt) else {
                return Err(err);
            };
            if Instant::now() + delay >= deadline {
                return Err(err);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Attempt failed, retrying");

            tokio::select! {
                biased;
                _ = cancelled(cancel) => return Err(ResilienceError::Cancelled.into()),
                _ = tokio::time::sleep(delay) => {}
            }

            last_error = Some(err);
        }
    }
}

impl Default for RetryPolicy {
    /// Defaults:
    /// - `max_attempts`: 2
    /// - `interval`: 3s
    /// - `timeout`: 24s
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[async_trait]
impl BackoffStrategy for RetryPolicy {
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Classify + From<ResilienceError> + Send + Sync + 'static,
    {
        self.run(operation, None).await
    }

    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then_some(self.interval)
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Builder for configuring [`RetryPolicy`].
///
/// # Examples
///
/// ```rust
/// use mint_core::retry::{BackoffStrategy, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(4)
///     .interval(Duration::from_millis(250))
///     .build();
///
/// assert_eq!(policy.max_attempts(), 4);
/// ```
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl RetryPolicyBuilder {
    /// Set the total number of attempts, the first one included.
    ///
    /// Values below 1 are raised to 1. Default: 2
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    /// Set the fixed wait between attempts.
    ///
    /// Default: 3s
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set the overall budget, measured from the first attempt.
    ///
    /// Default: 24s
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the [`RetryPolicy`], using defaults for unset parameters.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            interval: self.interval.unwrap_or(DEFAULT_INTERVAL),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}
