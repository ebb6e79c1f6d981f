//! Common test utilities and helpers

#![allow(dead_code)]

pub mod mock_transport;

use std::sync::Arc;
use std::time::Duration;

use mint_api::{CircuitBreakerConfig, Client, Credentials};
use mint_transport::Transport;

pub use mock_transport::MockTransport;

/// Token the tests authorize with
pub const TEST_TOKEN: &str = "test-access-token";

/// User the tests authorize as
pub const TEST_USER: &str = "1001";

/// Builder preset with retry waits short enough for real-time tests.
pub fn fast_builder() -> mint_api::MintClientBuilder {
    Client::builder()
        .max_attempts(2)
        .retry_interval(Duration::from_millis(10))
        .retry_timeout(Duration::from_secs(5))
}

/// Client against a mock server, without a session.
pub fn client_for(base_url: impl Into<String>) -> Client {
    fast_builder()
        .base_url(base_url)
        .build()
        .expect("Failed to build client")
}

/// Client against a mock server, already authorized.
pub fn authorized_client_for(base_url: impl Into<String>) -> Client {
    fast_builder()
        .base_url(base_url)
        .credentials(Credentials::new(TEST_TOKEN, TEST_USER))
        .build()
        .expect("Failed to build client")
}

/// Client over a scripted transport.
pub fn client_with_transport(transport: Arc<MockTransport>, authorized: bool) -> Client {
    let mut builder = fast_builder()
        .base_url("http://mint.test")
        .transport(transport as Arc<dyn Transport>);
    if authorized {
        builder = builder.credentials(Credentials::new(TEST_TOKEN, TEST_USER));
    }
    builder.build().expect("Failed to build client")
}

/// Breaker that trips after a handful of calls.
pub fn sensitive_breaker() -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        threshold: 50,
        minimum_calls: 2,
        circuit_duration: Duration::from_secs(3600),
        ..Default::default()
    }
}
