//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → registry.rs (resolve the dependency's circuit breaker)
//!     → circuit_breaker.rs (may the call proceed? Open fails fast)
//!     → retries.rs (run the call, retry transient failures)
//!     → backoff.rs (delay between attempts, jitter for RPC)
//! ```
//!
//! # Design Decisions
//! - The breaker sees one logical outcome per guarded call, not one per
//!   network attempt; the whole retry loop runs inside the guard
//! - One lock per breaker; calls to different dependencies never block
//!   each other
//! - Retryability is decided by the error type, not by the executor

pub mod backoff;
pub mod circuit_breaker;
pub mod registry;
pub mod retries;

pub use backoff::BackoffSchedule;
pub use circuit_breaker::{BreakerOpenError, BreakerState, CircuitBreaker, GuardError};
pub use registry::CircuitBreakerRegistry;
pub use retries::{RetryError, RetryExecutor, RetryPolicy, Retryable};
