//! Resilience layer for outbound remote dependencies.
//!
//! Protects application code from failures of downstream HTTP and RPC
//! services by combining per-dependency circuit breaking with
//! configurable retry-with-backoff.
//!
//! ```text
//!                         ┌──────────────────────────────────────────┐
//!                         │             RESILIENCE LAYER             │
//!     caller              │                                          │
//!     ───────────────────▶│  client ──▶ breaker registry             │
//!                         │     │            │                       │
//!                         │     ▼            ▼                       │
//!                         │  retry loop ◀─ circuit breaker (guard)   │
//!                         │     │                                    │
//!                         │     ▼                                    │
//!                         │  transport attempt (per-attempt timeout) │──▶ dependency
//!                         │                                          │
//!                         │  cross-cutting: config, observability    │
//!                         └──────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod http;
pub mod resilience;
pub mod rpc;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::ResilienceConfig;
pub use http::{HttpError, RequestOptions, ResilientHttpClient};
pub use resilience::{BreakerState, CircuitBreaker, CircuitBreakerRegistry};
pub use rpc::{ResilientRpcClient, RpcError, RpcStatus, RpcTransport};
