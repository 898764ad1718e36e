//! HTTP client error taxonomy and per-request options.

use std::time::Duration;

use thiserror::Error;

use crate::resilience::retries::Retryable;

// Re-export HttpClientConfig from config module to avoid duplication
pub use crate::config::schema::HttpClientConfig;

/// Errors surfaced by the resilient HTTP client.
///
/// Timeout and connection failures are transient and retried; anything
/// else fails the call on first occurrence. Response status codes are
/// never interpreted as errors here.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The attempt exceeded its time budget.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Connection establishment failed (refused, unreachable, DNS).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other request failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// The dependency's circuit breaker is open; no attempt was made.
    #[error("Service temporarily unavailable: circuit breaker {0} is open")]
    CircuitOpen(String),

    /// The base URL or path could not be resolved into a request URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Result type for HTTP client operations.
pub type HttpResult<T> = Result<T, HttpError>;

impl Retryable for HttpError {
    fn is_retryable(&self) -> bool {
        matches!(self, HttpError::Timeout(_) | HttpError::Connection(_))
    }

    fn error_class(&self) -> &'static str {
        match self {
            HttpError::Timeout(_) => "timeout",
            HttpError::Connection(_) => "connection",
            HttpError::Request(_) => "request",
            HttpError::CircuitOpen(_) => "circuit_open",
            HttpError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// Request body payload.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON with the matching content type.
    Json(serde_json::Value),
    /// Sent verbatim.
    Text(String),
}

/// Per-request options.
///
/// Everything is optional; client-level configuration fills the gaps.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers.
    pub headers: Vec<(String, String)>,

    /// Query string pairs appended to the URL.
    pub query: Vec<(String, String)>,

    /// Request body.
    pub body: Option<RequestBody>,

    /// Basic auth credentials (username, optional password).
    pub basic_auth: Option<(String, Option<String>)>,

    /// Override of the client's per-attempt timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.basic_auth = Some((username.into(), password.map(Into::into)));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
