//! HTTP client utilities for the storefront POS client.
//!
//! Provides a small builder API on top of a pluggable [`Transport`], with
//! automatic JSON handling and a single error type for both HTTP and
//! transport failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use pos_data::ApiClient;
//! use std::time::Duration;
//!
//! let client = ApiClient::http("http://localhost:8000/api", Duration::from_secs(10))?;
//!
//! let products: serde_json::Value = client
//!     .get("/products/")
//!     .query("search", "rice")
//!     .send()
//!     .await?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::ApiError;
pub use request::{Method, Request};
pub use response::Response;
pub use transport::{HttpTransport, Transport};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client bound to a base URL.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    default_headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client over an existing transport.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Create a client that talks HTTP with the given request timeout.
    pub fn http(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self::new(base_url, Arc::new(HttpTransport::new(timeout)?)))
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Send a bearer token with every request.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_default_header("Authorization", value)
    }

    /// The base URL every path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request.
    pub fn get(&self, path: impl Into<String>) -> ClientRequest {
        self.request(Method::Get, path)
    }

    /// Create a POST request.
    pub fn post(&self, path: impl Into<String>) -> ClientRequest {
        self.request(Method::Post, path)
    }

    /// Create a PUT request.
    pub fn put(&self, path: impl Into<String>) -> ClientRequest {
        self.request(Method::Put, path)
    }

    /// Create a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> ClientRequest {
        self.request(Method::Delete, path)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ClientRequest {
        let mut request = Request::new(method, &self.base_url, path)
            .header("Accept", "application/json");
        for (key, value) in &self.default_headers {
            request = request.header(key.clone(), value.clone());
        }

        ClientRequest {
            request,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request bound to a client's transport.
pub struct ClientRequest {
    request: Request,
    transport: Arc<dyn Transport>,
}

impl ClientRequest {
    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request = self.request.query(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ApiError> {
        self.request = self.request.json(value)?;
        Ok(self)
    }

    /// Send the request. Non-2xx responses become [`ApiError`]s.
    pub async fn send(self) -> Result<Response, ApiError> {
        let method = self.request.method.as_str();
        let path = self.request.path.clone();
        tracing::debug!(method, path = %path, "sending request");

        let response = self.transport.send(self.request).await.map_err(|e| {
            tracing::warn!(method, path = %path, error = %e, "request failed without response");
            e
        })?;

        tracing::debug!(method, path = %path, status = response.status, "response received");
        response.error_for_status()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, ApiError, Method, Response, Transport};
}
