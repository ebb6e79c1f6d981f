#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Resilience primitives for the Mint API client.
//!
//! This crate holds the two pieces of the request path that carry real
//! behavioural contracts, independent of HTTP:
//!
//! - **Retry** via the [`BackoffStrategy`](retry::BackoffStrategy) trait and its
//!   fixed-interval implementation [`RetryPolicy`](retry::RetryPolicy)
//!   - bounded attempt count
//!   - overall time budget measured from the first attempt
//!   - a predicate that never retries rejected credentials
//!   - optional cancellation
//! - **Circuit breaking** via [`CircuitBreaker`](breaker::CircuitBreaker)
//!   - failure ratio over a rolling, bucketed window
//!   - cooldown followed by a single half-open probe
//!
//! Both are generic over the caller's error type. Errors describe how they
//! should be treated by implementing [`Classify`].
//!
//! # Examples
//!
//! ```rust
//! use mint_core::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum CallError {
//!     #[error("backend hiccup")]
//!     Hiccup,
//!     #[error(transparent)]
//!     Resilience(#[from] ResilienceError),
//! }
//!
//! impl Classify for CallError {
//!     fn failure_class(&self) -> FailureClass {
//!         FailureClass::Transient
//!     }
//! }
//!
//! # async fn example() -> Result<(), CallError> {
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .interval(Duration::from_millis(10))
//!     .build();
//! let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());
//!
//! let value = breaker
//!     .exec(|| policy.execute(|| async { Ok::<_, CallError>(42) }))
//!     .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod breaker;
pub mod error;
pub mod retry;

pub use error::{Classify, FailureClass, ResilienceError};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use mint_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
    pub use crate::error::{Classify, FailureClass, ResilienceError};
    pub use crate::retry::{BackoffStrategy, RetryPolicy, RetryPolicyBuilder};
}
