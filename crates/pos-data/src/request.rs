//! HTTP request builder.

use crate::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// An outbound request, built up before being handed to a transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) url: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl Request {
    /// Create a new request for `path` resolved against `base_url`.
    pub fn new(method: Method, base_url: &str, path: impl Into<String>) -> Self {
        let path = path.into();
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.clone()
        } else {
            format!("{}{}", base_url.trim_end_matches('/'), path)
        };
        Self {
            method,
            path,
            url,
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a query parameter. Encoding is left to the transport.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ApiError> {
        let json = serde_json::to_vec(value).map_err(ApiError::serialization)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The endpoint path as given by the caller (e.g. `/products/3/`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fully resolved URL, without the query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Decode the JSON body, if any.
    pub fn json_body<T: DeserializeOwned>(&self) -> Option<Result<T, ApiError>> {
        self.body
            .as_deref()
            .map(|bytes| serde_json::from_slice(bytes).map_err(ApiError::serialization))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let req = Request::new(Method::Get, "http://localhost:8000/api/", "/products/");
        assert_eq!(req.url(), "http://localhost:8000/api/products/");
        assert_eq!(req.path(), "/products/");
    }

    #[test]
    fn test_absolute_url_is_kept() {
        let req = Request::new(Method::Get, "http://localhost:8000/api", "https://cdn.example.com/x");
        assert_eq!(req.url(), "https://cdn.example.com/x");
    }

    #[test]
    fn test_json_sets_content_type() {
        let req = Request::new(Method::Post, "http://h", "/sales/")
            .json(&serde_json::json!({"quantity": 2}))
            .unwrap();
        assert_eq!(
            req.headers().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        let body: serde_json::Value = req.json_body().unwrap().unwrap();
        assert_eq!(body["quantity"], 2);
    }

    #[test]
    fn test_unencodable_body_fails_locally() {
        let mut body = std::collections::BTreeMap::new();
        body.insert((1, 2), "non-string keys cannot be JSON");
        let err = Request::new(Method::Post, "http://h", "/sales/")
            .json(&body)
            .unwrap_err();
        assert!(err.is_local());
        assert!(!err.is_network());
    }

    #[test]
    fn test_query_params_kept_raw() {
        let req = Request::new(Method::Get, "http://h", "/products/").query("search", "rice & beans");
        assert_eq!(req.query_param("search"), Some("rice & beans"));
        assert_eq!(req.query_param("page"), None);
    }
}
