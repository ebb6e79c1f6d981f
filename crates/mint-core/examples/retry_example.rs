//! Example: Retrying a flaky call behind a circuit breaker
//!
//! This example demonstrates:
//! 1. Fixed-interval retry recovering from a single transient failure
//! 2. Rejected failures failing fast without a retry
//! 3. The breaker opening once the failure ratio crosses its threshold
//!
//! Run with:
//! ```bash
//! cargo run -p mint-core --example retry_example
//! ```

use mint_core::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("service unavailable")]
    Unavailable,
    #[error("token rejected")]
    Unauthorized,
    #[error(transparent)]
    Resilience(#[from] ResilienceError),
}

impl Classify for ApiError {
    fn failure_class(&self) -> FailureClass {
        match self {
            ApiError::Unavailable => FailureClass::Transient,
            ApiError::Unauthorized => FailureClass::Rejected,
            ApiError::Resilience(err) => err.failure_class(),
        }
    }
}

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<&'static str, ApiError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED (service unavailable)", attempt + 1);
            Err(ApiError::Unavailable)
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("profile data")
        }
    }
}

#[tokio::main]
async fn main() {
    let policy = RetryPolicy::builder()
        .max_attempts(2)
        .interval(Duration::from_millis(200))
        .timeout(Duration::from_secs(2))
        .build();

    println!("=== Example 1: One transient failure ===");
    let api = UnreliableApi::new(1);
    let start = Instant::now();
    match policy.execute(|| api.call()).await {
        Ok(data) => println!("  Got {data:?} after {:?}", start.elapsed()),
        Err(err) => println!("  Failed: {err}"),
    }

    println!("\n=== Example 2: Rejected credentials ===");
    let attempts = AtomicU32::new(0);
    let result = policy
        .execute(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ApiError::Unauthorized)
        })
        .await;
    println!(
        "  {:?} after {} attempt(s)",
        result.err(),
        attempts.load(Ordering::SeqCst)
    );

    println!("\n=== Example 3: Breaker opening ===");
    let breaker = CircuitBreaker::new(CircuitBreakerConfig {
        minimum_calls: 4,
        circuit_duration: Duration::from_secs(5),
        ..Default::default()
    });
    let api = UnreliableApi::new(u32::MAX);

    for call in 1..=6 {
        let result = breaker.exec(|| policy.execute(|| api.call())).await;
        println!("  Call {call}: {:?} (breaker {})", result.err(), breaker.state());
    }

    let stats = breaker.stats();
    println!(
        "  {} failures, {} refused, {:.0}% failure rate",
        stats.failures,
        stats.rejected_calls,
        stats.failure_percentage()
    );
}
