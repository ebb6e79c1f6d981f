//! Centralized observability utilities for structured logging
//!
//! Every request attempt made by the executor is logged through this layer.
//! With the `trace` feature, [`init_tracing`] installs a subscriber that
//! honours `RUST_LOG`.

use mint_transport::{HttpRequest, RequestBody};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET or POST)
    pub method: &'static str,
    /// Request path
    pub path: String,
    /// Number of form fields, or `None` for other bodies
    pub form_fields: Option<usize>,
}

impl RequestMetadata {
    /// Metadata describing an outgoing request. The query string is left out
    /// since it can carry coordinates.
    pub fn from_request(request: &HttpRequest) -> Self {
        let path = url::Url::parse(request.url())
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| request.url().to_string());

        Self {
            method: request.method().as_str(),
            path,
            form_fields: match request.body() {
                Some(RequestBody::Form(pairs)) => Some(pairs.len()),
                _ => None,
            },
        }
    }

    /// Log request being sent
    pub fn log_request(&self, attempt: u32) {
        debug!(
            method = self.method,
            path = %self.path,
            form_fields = self.form_fields,
            attempt,
            "Sending HTTP request"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code, `None` if no response arrived
    pub status: Option<u16>,
    /// Time elapsed for the attempt
    pub elapsed: Duration,
    /// 1-indexed attempt number
    pub attempt: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: Option<u16>, elapsed: Duration, attempt: u32) -> Self {
        Self {
            status,
            elapsed,
            attempt,
        }
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            attempt = self.attempt,
            "HTTP request succeeded"
        );
    }

    /// Log failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %error,
            attempt = self.attempt,
            "HTTP request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Log a call refused before reaching the network
pub fn log_precondition_failed(operation: &str, reason: &str) {
    debug!(operation, reason = %reason, "Precondition failed, no request sent");
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Defaults to `mint_api=info` when `RUST_LOG` is unset. Calling it more than
/// once is harmless: only the first subscriber is installed.
#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mint_api=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
