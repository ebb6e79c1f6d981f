//! The single call path every domain operation goes through.
//!
//! ```text
//! breaker.exec(|| retry.execute(|| transport.send(request) → classify))
//! ```
//!
//! One breaker is shared by reads and writes, so a backend that keeps failing
//! reads also stops writes from being sent.

use mint_core::breaker::CircuitBreaker;
use mint_core::retry::{BackoffStrategy, RetryPolicy};
use mint_transport::{HttpRequest, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_util::sync::CancellationToken;

use super::classifier::classify;
use crate::error::Result;
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};

/// Executes requests with retry and circuit breaking.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    breaker: Arc<CircuitBreaker>,
}

impl RequestExecutor {
    /// Create an executor.
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            transport,
            retry,
            breaker,
        }
    }

    /// The circuit breaker guarding this executor.
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// The retry policy applied to every call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send `request` as a GET, without a body.
    pub async fn read(&self, request: HttpRequest) -> Result<Value> {
        self.execute(request.into_get(), None).await
    }

    /// Send `request` as a POST, with its body.
    pub async fn write(&self, request: HttpRequest) -> Result<Value> {
        self.execute(request.into_post(), None).await
    }

    /// [`read`](Self::read) that stops with [`Error::Cancelled`](crate::Error::Cancelled)
    /// once `token` fires, aborting the in-flight attempt or retry wait.
    pub async fn read_cancellable(&self, request: HttpRequest, token: &CancellationToken) -> Result<Value> {
        self.execute(request.into_get(), Some(token)).await
    }

    /// [`write`](Self::write) that stops with [`Error::Cancelled`](crate::Error::Cancelled)
    /// once `token` fires, aborting the in-flight attempt or retry wait.
    pub async fn write_cancellable(&self, request: HttpRequest, token: &CancellationToken) -> Result<Value> {
        self.execute(request.into_post(), Some(token)).await
    }

    async fn execute(&self, request: HttpRequest, cancel: Option<&CancellationToken>) -> Result<Value> {
        let request = &request;
        let metadata = &RequestMetadata::from_request(request);
        let attempts = &AtomicU32::new(0);

        let operation = || async move {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            self.attempt(request, metadata, attempt).await
        };

        self.breaker
            .exec(|| async {
                match cancel {
                    Some(token) => self.retry.execute_cancellable(operation, token).await,
                    None => self.retry.execute(operation).await,
                }
            })
            .await
    }

    async fn attempt(&self, request: &HttpRequest, metadata: &RequestMetadata, attempt: u32) -> Result<Value> {
        metadata.log_request(attempt);
        let timer = RequestTimer::start();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                ResponseMetadata::new(None, timer.elapsed(), attempt).log_error(metadata, &err.to_string());
                return Err(err.into());
            }
        };

        let result = classify(response.status, &response.status_text, &response.body)
            .and_then(|outcome| outcome.into_result());

        let response_metadata = ResponseMetadata::new(Some(response.status), timer.elapsed(), attempt);
        match &result {
            Ok(_) => response_metadata.log_success(metadata),
            Err(err) => response_metadata.log_error(metadata, &err.to_string()),
        }

        result
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("retry", &self.retry)
            .field("breaker", &self.breaker.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use mint_core::breaker::{CircuitBreakerConfig, CircuitState};
    use mint_transport::{HttpResponse, Method, TransportError};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted responses and records what it was asked to send.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<mint_transport::Result<HttpResponse>>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<mint_transport::Result<HttpResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                sent: Mutex::default(),
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &HttpRequest) -> mint_transport::Result<HttpResponse> {
            self.sent.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, "OK", b"{}".to_vec())))
        }
    }

    fn executor(transport: Arc<ScriptedTransport>) -> RequestExecutor {
        let retry = RetryPolicy::builder()
            .max_attempts(2)
            .interval(Duration::from_millis(100))
            .timeout(Duration::from_secs(5))
            .build();
        let breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig {
            minimum_calls: 4,
            ..Default::default()
        }));
        RequestExecutor::new(transport, retry, breaker)
    }

    fn ok(body: &str) -> mint_transport::Result<HttpResponse> {
        Ok(HttpResponse::new(200, "OK", body.as_bytes().to_vec()))
    }

    fn status(code: u16, text: &str) -> mint_transport::Result<HttpResponse> {
        Ok(HttpResponse::new(code, text, Vec::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_sends_get_without_body() {
        let transport = ScriptedTransport::new(vec![ok(r#"{"id":1}"#)]);
        let executor = executor(transport.clone());

        let request = HttpRequest::post("https://api.mint.me/v5/me").with_form([("a", "b")]);
        let value = executor.read(request).await.unwrap();

        assert_eq!(value, json!({"id": 1}));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method(), Method::Get);
        assert!(sent[0].body().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_sends_post_with_body() {
        let transport = ScriptedTransport::new(vec![ok("{}")]);
        let executor = executor(transport.clone());

        let request = HttpRequest::get("https://api.mint.me/v5/me/favorites").with_form([("id", "9")]);
        executor.write(request).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].method(), Method::Post);
        assert!(sent[0].body().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorization_failure_single_attempt() {
        let transport = ScriptedTransport::new(vec![status(401, "Unauthorized")]);
        let executor = executor(transport.clone());

        let err = executor
            .read(HttpRequest::get("https://api.mint.me/v5/me"))
            .await
            .unwrap_err();

        assert_eq!(err, Error::NotAuthorized);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_surfaces_last_attempt() {
        let transport = ScriptedTransport::new(vec![
            status(500, "Internal Server Error"),
            status(503, "Service Unavailable"),
        ]);
        let executor = executor(transport.clone());

        let err = executor
            .read(HttpRequest::get("https://api.mint.me/v5/me"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::Api {
                code: 503,
                message: "Service Unavailable".into()
            }
        );
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Connection("reset".into())),
            ok(r#"{"ok":true}"#),
        ]);
        let executor = executor(transport.clone());

        let value = executor
            .read(HttpRequest::get("https://api.mint.me/v5/me"))
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_counts_logical_calls() {
        let transport = ScriptedTransport::new(
            (0..8).map(|_| status(502, "Bad Gateway")).collect(),
        );
        let executor = executor(transport.clone());

        for _ in 0..4 {
            let _ = executor.read(HttpRequest::get("https://api.mint.me/v5/me")).await;
        }
        assert_eq!(executor.breaker().state(), CircuitState::Open);
        assert_eq!(transport.sent().len(), 8);

        let err = executor
            .write(HttpRequest::post("https://api.mint.me/v5/me/favorites"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::CircuitOpen);
        assert_eq!(transport.sent().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation() {
        let transport = ScriptedTransport::new(vec![status(503, "Service Unavailable")]);
        let token = CancellationToken::new();
        let executor = executor(transport.clone());

        token.cancel();
        let err = executor
            .read_cancellable(HttpRequest::get("https://api.mint.me/v5/me"), &token)
            .await
            .unwrap_err();

        assert_eq!(err, Error::Cancelled);
        assert_eq!(executor.breaker().stats().failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_is_per_call() {
        let transport = ScriptedTransport::new(vec![]);
        let token = CancellationToken::new();
        let executor = executor(transport.clone());

        token.cancel();
        let err = executor
            .write_cancellable(HttpRequest::post("https://api.mint.me/v1/oauth"), &token)
            .await
            .unwrap_err();
        assert_eq!(err, Error::Cancelled);

        executor
            .write(HttpRequest::post("https://api.mint.me/v1/oauth"))
            .await
            .unwrap();
        executor
            .read_cancellable(HttpRequest::get("https://api.mint.me/v5/me"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(transport.sent().len(), 2);
    }
}
