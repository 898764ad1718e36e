//! Resilient RPC client.
//!
//! # Responsibilities
//! - Execute calls against an RPC stub with a per-attempt deadline
//! - Retry transient statuses with jittered exponential backoff
//! - Annotate surfaced failures with the method name
//!
//! # Design Decisions
//! - Deadlines are per-attempt by default: every retry gets a fresh
//!   timeout budget, so a fully-retried call can exceed the passed
//!   timeout in wall-clock time. `cumulative_deadline` switches to one
//!   call-level budget.
//! - No breaker is built in; callers are expected to wrap `execute` in
//!   a shared named breaker from the registry so one failing service
//!   does not stall unrelated callers.
//! - The transport owns the wire format; this layer only sees statuses.

use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::config::RpcClientConfig;
use crate::observability::metrics;
use crate::resilience::backoff::BackoffSchedule;
use crate::resilience::retries::{RetryError, RetryExecutor, RetryPolicy, Retryable};
use crate::rpc::types::{RpcError, RpcResult, RpcStatus};

/// Capability supplied by an RPC stub: invoke one method with a payload
/// and an absolute deadline, yielding a response or a status.
pub trait RpcTransport: Send + Sync {
    fn invoke(
        &self,
        method: &str,
        request: &Value,
        deadline: Instant,
    ) -> impl Future<Output = Result<Value, RpcStatus>> + Send;
}

/// RPC client bound to one target endpoint.
#[derive(Debug)]
pub struct ResilientRpcClient<T> {
    endpoint: String,
    transport: T,
    config: RpcClientConfig,
    executor: RetryExecutor,
}

impl<T: RpcTransport> ResilientRpcClient<T> {
    pub fn new(endpoint: impl Into<String>, transport: T, config: RpcClientConfig) -> Self {
        let executor = RetryExecutor::new(RetryPolicy {
            max_retries: config.max_retries,
            backoff: BackoffSchedule::DoublingJitter {
                base: config.retry_base_delay(),
                jitter_step: config.retry_jitter_step(),
            },
        });

        Self {
            endpoint: endpoint.into(),
            transport,
            config,
            executor,
        }
    }

    /// The configured target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` with `request`, bounded by `timeout` per attempt
    /// (the client default when `None`).
    pub async fn execute(
        &self,
        method: &str,
        request: &Value,
        timeout: Option<Duration>,
    ) -> RpcResult<Value> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());

        // With a cumulative deadline the whole call shares one budget;
        // otherwise each attempt computes a fresh one below.
        let call_deadline = if self.config.cumulative_deadline {
            Some(Instant::now() + timeout)
        } else {
            None
        };

        let result = self
            .executor
            .run(method, |_attempt| {
                let deadline = call_deadline.unwrap_or_else(|| Instant::now() + timeout);
                self.invoke_once(method, request, deadline)
            })
            .await;

        metrics::record_request_outcome("rpc", result.is_ok());

        match result {
            Ok(response) => Ok(response),
            Err(RetryError::Fatal { error, .. }) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    method = %method,
                    status = error.error_class(),
                    "Non-retryable error for rpc call"
                );
                Err(RpcError::Fatal {
                    method: method.to_string(),
                    status: error,
                })
            }
            Err(RetryError::Exhausted { attempts, error }) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    method = %method,
                    attempts = attempts,
                    status = error.error_class(),
                    "Max retries exceeded for rpc call"
                );
                Err(RpcError::RetriesExhausted {
                    method: method.to_string(),
                    attempts,
                    status: error,
                })
            }
        }
    }

    /// One transport attempt, with the deadline enforced locally as
    /// well in case the stub ignores it.
    async fn invoke_once(
        &self,
        method: &str,
        request: &Value,
        deadline: Instant,
    ) -> Result<Value, RpcStatus> {
        let enforce_until = tokio::time::Instant::from_std(deadline);
        match tokio::time::timeout_at(enforce_until, self.transport.invoke(method, request, deadline))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RpcStatus::DeadlineExceeded(format!(
                "attempt deadline elapsed for {}",
                method
            ))),
        }
    }
}
