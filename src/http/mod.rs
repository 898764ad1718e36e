//! Outbound HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! request(method, path, options)
//!     → build URL (base + path, absolute passthrough)
//!     → circuit breaker guard (fail fast when open)
//!     → retry loop (transient transport failures only)
//!     → reqwest attempt (per-attempt timeout)
//!     → raw response back to the caller
//! ```

pub mod client;
pub mod types;

pub use client::ResilientHttpClient;
pub use types::{HttpError, HttpResult, RequestBody, RequestOptions};
