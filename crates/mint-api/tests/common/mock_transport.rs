//! Scripted in-memory transport that records every request it sees

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mint_transport::{HttpRequest, HttpResponse, Result, Transport, TransportError};

/// Plays back queued responses in order, then repeats the fallback.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<HttpResponse>>>,
    fallback: Result<HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Answer every request with `fallback` unless something is queued.
    pub fn new(fallback: Result<HttpResponse>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with `200 OK` and `body`.
    pub fn ok(body: &str) -> Self {
        Self::new(Ok(HttpResponse::new(200, "OK", body)))
    }

    /// Answer every request with a connection error.
    pub fn unreachable() -> Self {
        Self::new(Err(TransportError::Connection("connection refused".into())))
    }

    /// Queue a response ahead of the fallback.
    pub fn push(&self, response: Result<HttpResponse>) -> &Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    /// Queue a JSON body with the given status.
    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Ok(HttpResponse::new(status, "", body.to_string())))
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}
