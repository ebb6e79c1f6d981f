//! Retry strategies.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`RetryPolicy`] - Fixed-interval retry bounded by attempts and an overall timeout
//!
//! # Examples
//!
//! ```rust
//! use mint_core::retry::{BackoffStrategy, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::builder()
//!     .max_attempts(2)
//!     .interval(Duration::from_secs(3))
//!     .timeout(Duration::from_secs(24))
//!     .build();
//!
//! assert_eq!(policy.max_attempts(), 2);
//! assert_eq!(policy.next_delay(1), Some(Duration::from_secs(3)));
//! assert_eq!(policy.next_delay(2), None);
//! ```

mod policy;
mod strategy;

pub use policy::{RetryPolicy, RetryPolicyBuilder};
pub use strategy::BackoffStrategy;
