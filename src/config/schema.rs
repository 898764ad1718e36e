//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! resilience layer. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the resilience layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Outbound HTTP client settings.
    pub http_client: HttpClientConfig,

    /// Outbound RPC client settings.
    pub rpc_client: RpcClientConfig,

    /// Circuit breaker settings applied to lazily-created breakers.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
///
/// Immutable per breaker instance; the registry applies it at creation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// Consecutive successes in half-open before the circuit closes.
    pub success_threshold: u32,

    /// How long the circuit stays open before a probe is allowed, in
    /// milliseconds.
    pub open_timeout_ms: u64,
}

impl CircuitBreakerConfig {
    /// Cool-down period as a [`Duration`].
    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            open_timeout_ms: 60_000,
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Total request timeout per attempt in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Maximum number of retry attempts after the initial call.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Guard requests with a circuit breaker.
    pub use_circuit_breaker: bool,

    /// Breaker sharing key. When unset, a name is derived from the base
    /// URL so every client of the same target shares one breaker.
    pub breaker_name: Option<String>,
}

impl HttpClientConfig {
    /// Per-attempt request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connection timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Backoff base delay as a [`Duration`].
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            connect_timeout_secs: 3,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            use_circuit_breaker: true,
            breaker_name: None,
        }
    }
}

/// Outbound RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcClientConfig {
    /// Default per-attempt deadline in milliseconds.
    pub default_timeout_ms: u64,

    /// Maximum number of retry attempts after the initial call.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Step multiplied into the random jitter term, in milliseconds.
    pub retry_jitter_step_ms: u64,

    /// When true, one deadline covers the whole call including retries.
    /// When false, every attempt gets a fresh timeout budget, so total
    /// wall-clock time for a fully-retried call can exceed the timeout.
    pub cumulative_deadline: bool,
}

impl RpcClientConfig {
    /// Default per-attempt deadline as a [`Duration`].
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Backoff base delay as a [`Duration`].
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Jitter step as a [`Duration`].
    pub fn retry_jitter_step(&self) -> Duration {
        Duration::from_millis(self.retry_jitter_step_ms)
    }
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 2000,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            retry_jitter_step_ms: 1,
            cumulative_deadline: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
