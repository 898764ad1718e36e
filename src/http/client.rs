//! Resilient HTTP client.
//!
//! # Responsibilities
//! - Execute outbound HTTP requests against a base target
//! - Retry transient transport failures with exponential backoff
//! - Guard the whole call with the target's shared circuit breaker
//!
//! # Design Decisions
//! - The breaker observes one logical outcome per request: the retry
//!   loop runs inside the guard, so an exhausted sequence counts as a
//!   single failure
//! - Response status codes are returned raw, never turned into errors;
//!   callers decide what a 4xx/5xx means
//! - Clients of the same base URL share one breaker by default

use std::sync::Arc;

use reqwest::Method;
use url::Url;

use crate::config::ResilienceConfig;
use crate::http::types::{HttpError, HttpResult, RequestBody, RequestOptions};
use crate::observability::metrics;
use crate::resilience::backoff::BackoffSchedule;
use crate::resilience::circuit_breaker::{CircuitBreaker, GuardError};
use crate::resilience::registry::{self, CircuitBreakerRegistry};
use crate::resilience::retries::{RetryError, RetryExecutor, RetryPolicy, Retryable};

/// HTTP client bound to one base target, with retry and circuit
/// breaking composed around every request.
#[derive(Debug, Clone)]
pub struct ResilientHttpClient {
    base_url: Url,
    http: reqwest::Client,
    executor: RetryExecutor,
    breaker: Option<Arc<CircuitBreaker>>,
}

impl ResilientHttpClient {
    /// Create a client using the process-wide breaker registry.
    pub fn new(base_url: &str, config: &ResilienceConfig) -> HttpResult<Self> {
        Self::with_registry(base_url, config, registry::global())
    }

    /// Create a client resolving its breaker from an explicit registry.
    pub fn with_registry(
        base_url: &str,
        config: &ResilienceConfig,
        registry: &CircuitBreakerRegistry,
    ) -> HttpResult<Self> {
        let parsed: Url = base_url
            .parse()
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http_config = &config.http_client;
        let http = reqwest::Client::builder()
            .timeout(http_config.timeout())
            .connect_timeout(http_config.connect_timeout())
            .build()
            .map_err(|e| HttpError::Request(format!("failed to build HTTP client: {}", e)))?;

        let breaker = if http_config.use_circuit_breaker {
            let name = http_config
                .breaker_name
                .clone()
                .unwrap_or_else(|| format!("http_client_{}", base_url));
            Some(registry.get_or_create(&name, &config.circuit_breaker))
        } else {
            None
        };

        let executor = RetryExecutor::new(RetryPolicy {
            max_retries: http_config.max_retries,
            backoff: BackoffSchedule::Doubling {
                base: http_config.retry_base_delay(),
            },
        });

        Ok(Self {
            base_url: parsed,
            http,
            executor,
            breaker,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The breaker guarding this client, if enabled.
    pub fn breaker(&self) -> Option<&Arc<CircuitBreaker>> {
        self.breaker.as_ref()
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> HttpResult<reqwest::Response> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> HttpResult<reqwest::Response> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> HttpResult<reqwest::Response> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> HttpResult<reqwest::Response> {
        self.request(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> HttpResult<reqwest::Response> {
        self.request(Method::DELETE, path, options).await
    }

    /// Execute a request with retry and (when enabled) breaker guard.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> HttpResult<reqwest::Response> {
        let url = self.build_url(path)?;

        let outcome = match &self.breaker {
            Some(breaker) => breaker
                .guard(|| self.run_attempts(&method, &url, &options))
                .await
                .map_err(|err| match err {
                    GuardError::Open(open) => {
                        tracing::warn!(
                            breaker = %open.name,
                            method = %method,
                            url = %url,
                            "Request rejected by open circuit breaker"
                        );
                        HttpError::CircuitOpen(open.name)
                    }
                    GuardError::Inner(retry_err) => self.surface(retry_err, &method, &url),
                }),
            None => self
                .run_attempts(&method, &url, &options)
                .await
                .map_err(|retry_err| self.surface(retry_err, &method, &url)),
        };

        metrics::record_request_outcome("http", outcome.is_ok());
        outcome
    }

    async fn run_attempts(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, RetryError<HttpError>> {
        let operation = format!("{} {}", method, url);
        self.executor
            .run(&operation, |_attempt| self.send_once(method, url, options))
            .await
    }

    /// One network attempt: build, send, classify.
    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
    ) -> HttpResult<reqwest::Response> {
        let mut request = self.http.request(method.clone(), url.clone());

        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        match &options.body {
            Some(RequestBody::Json(json)) => request = request.json(json),
            Some(RequestBody::Text(text)) => request = request.body(text.clone()),
            None => {}
        }
        if let Some((username, password)) = &options.basic_auth {
            request = request.basic_auth(username, password.as_deref());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => {
                tracing::info!(
                    method = %method,
                    url = %url,
                    status = response.status().as_u16(),
                    "HTTP request completed"
                );
                Ok(response)
            }
            Err(e) => Err(classify_transport_error(&e)),
        }
    }

    /// Surface the retry loop's failure unchanged in kind, with attempt
    /// metadata in the log.
    fn surface(&self, err: RetryError<HttpError>, method: &Method, url: &Url) -> HttpError {
        let attempts = err.attempts();
        let error = err.into_error();
        tracing::error!(
            method = %method,
            url = %url,
            attempts = attempts,
            error_class = error.error_class(),
            error = %error,
            "HTTP request failed"
        );
        error
    }

    /// Resolve a path against the base URL; absolute URLs pass through.
    fn build_url(&self, path: &str) -> HttpResult<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.parse()
                .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", path, e)))
        } else {
            self.base_url
                .join(path)
                .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", path, e)))
        }
    }
}

/// Map a transport failure into the client's error taxonomy.
///
/// Timeouts are checked first: a connect timeout is both `is_timeout`
/// and `is_connect`, and counts as a timeout.
fn classify_transport_error(e: &reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout(e.to_string())
    } else if e.is_connect() {
        HttpError::Connection(e.to_string())
    } else {
        HttpError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(registry: &CircuitBreakerRegistry) -> ResilientHttpClient {
        ResilientHttpClient::with_registry(
            "https://api.example.com",
            &ResilienceConfig::default(),
            registry,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let registry = CircuitBreakerRegistry::new();
        let result = ResilientHttpClient::with_registry(
            "not a url",
            &ResilienceConfig::default(),
            &registry,
        );
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_build_url_joins_relative_path() {
        let registry = CircuitBreakerRegistry::new();
        let client = test_client(&registry);
        let url = client.build_url("/users").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users");
    }

    #[test]
    fn test_build_url_passes_absolute_through() {
        let registry = CircuitBreakerRegistry::new();
        let client = test_client(&registry);
        let url = client.build_url("https://other-api.com/endpoint").unwrap();
        assert_eq!(url.as_str(), "https://other-api.com/endpoint");
    }

    #[test]
    fn test_breaker_name_derived_from_base_url() {
        let registry = CircuitBreakerRegistry::new();
        let client = test_client(&registry);
        assert_eq!(
            client.breaker().unwrap().name(),
            "http_client_https://api.example.com"
        );
    }

    #[test]
    fn test_clients_of_same_target_share_breaker() {
        let registry = CircuitBreakerRegistry::new();
        let a = test_client(&registry);
        let b = test_client(&registry);
        assert!(Arc::ptr_eq(a.breaker().unwrap(), b.breaker().unwrap()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_breaker_name_is_sharing_key() {
        let registry = CircuitBreakerRegistry::new();
        let mut config = ResilienceConfig::default();
        config.http_client.breaker_name = Some("payments".to_string());

        let a =
            ResilientHttpClient::with_registry("https://a.example.com", &config, &registry)
                .unwrap();
        let b =
            ResilientHttpClient::with_registry("https://b.example.com", &config, &registry)
                .unwrap();
        assert!(Arc::ptr_eq(a.breaker().unwrap(), b.breaker().unwrap()));
        assert_eq!(a.breaker().unwrap().name(), "payments");
    }

    #[test]
    fn test_breaker_can_be_disabled() {
        let registry = CircuitBreakerRegistry::new();
        let mut config = ResilienceConfig::default();
        config.http_client.use_circuit_breaker = false;

        let client =
            ResilientHttpClient::with_registry("https://api.example.com", &config, &registry)
                .unwrap();
        assert!(client.breaker().is_none());
        assert!(registry.is_empty());
    }
}
