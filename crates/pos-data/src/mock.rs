//! Scripted in-memory transport.
//!
//! A [`MockTransport`] answers every request with a caller-supplied handler
//! and keeps a log of what was sent, so tests can simulate a backend and
//! then assert on the traffic.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{ApiError, Method, Request, Response, Transport};

type Handler = dyn Fn(&Request) -> Result<Response, ApiError> + Send + Sync;

/// Transport that routes every request through a closure.
pub struct MockTransport {
    handler: Box<Handler>,
    sent: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Create a mock that answers with `handler`.
    pub fn new(
        handler: impl Fn(&Request) -> Result<Response, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.sent.lock().clone()
    }

    /// Requests sent with `method` to exactly `path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Request> {
        self.sent
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Forget recorded requests.
    pub fn reset(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        self.sent.lock().push(request.clone());
        (self.handler)(&request)
    }
}

/// Build a JSON response with the given status.
pub fn json_response<T: Serialize + ?Sized>(status: u16, value: &T) -> Response {
    let body = serde_json::to_vec(value).unwrap_or_default();
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    Response::new(status, headers, body)
}

/// Build a response with no body.
pub fn empty_response(status: u16) -> Response {
    Response::new(status, HashMap::new(), Vec::new())
}
