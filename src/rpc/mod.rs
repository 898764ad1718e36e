//! Outbound RPC client subsystem.
//!
//! # Data Flow
//! ```text
//! execute(method, request, timeout)
//!     → fresh per-attempt deadline (now + timeout)
//!     → retry loop (unavailable / deadline / exhausted only)
//!     → transport invoke (stub owns the wire format)
//!     → response, or last status annotated with the method
//! ```
//!
//! Callers needing circuit breaking wrap `execute` in a shared named
//! breaker resolved from the registry.

pub mod client;
pub mod types;

pub use client::{ResilientRpcClient, RpcTransport};
pub use types::{RpcError, RpcResult, RpcStatus};
