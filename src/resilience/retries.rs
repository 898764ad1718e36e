//! Retry execution with classified failures.
//!
//! # Responsibilities
//! - Invoke a unit of work and classify its failures
//! - Retry transient failures with the configured backoff schedule
//! - Surface fatal failures immediately, never retried
//!
//! # Design Decisions
//! - Retryability is a property of the error type ([`Retryable`]), so
//!   the loop is driven by pattern-matching on results, not by catching
//!   and re-raising
//! - The backoff sleep suspends only the calling task
//! - Attempt counts ride along on the surfaced error for diagnostics

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;

use crate::observability::metrics;
use crate::resilience::backoff::BackoffSchedule;

/// Failure classification consumed by the retry loop.
pub trait Retryable {
    /// Whether the failure is transient and eligible for retry.
    fn is_retryable(&self) -> bool;

    /// Short class name for logs (e.g. "timeout", "unavailable").
    fn error_class(&self) -> &'static str;
}

/// Retry policy: how many times, and how long between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Delay schedule between attempts.
    pub backoff: BackoffSchedule,
}

impl RetryPolicy {
    /// No retries: a single attempt whose failure surfaces directly.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffSchedule::Doubling {
                base: Duration::from_secs(1),
            },
        }
    }
}

/// Failure surfaced by [`RetryExecutor::run`], with the source error
/// unchanged in kind and the number of attempts performed.
#[derive(Debug, Error)]
pub enum RetryError<E: std::fmt::Display> {
    /// A non-retryable failure; always surfaced on first occurrence.
    #[error("{error}")]
    Fatal { attempts: u32, error: E },

    /// All retries consumed; carries the last observed failure.
    #[error("{error} (after {attempts} attempts)")]
    Exhausted { attempts: u32, error: E },
}

impl<E: std::fmt::Display> RetryError<E> {
    /// Number of work invocations performed before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Fatal { attempts, .. } | RetryError::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Unwrap the classified source error.
    pub fn into_error(self) -> E {
        match self {
            RetryError::Fatal { error, .. } | RetryError::Exhausted { error, .. } => error,
        }
    }
}

/// Executes units of work under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `work` until it succeeds, fails fatally, or exhausts retries.
    ///
    /// `work` receives the 0-based attempt number. `operation` labels
    /// log lines and metrics. A fatal failure is surfaced after exactly
    /// one invocation with no sleep; exhaustion performs exactly
    /// `1 + max_retries` invocations.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut work: F) -> Result<T, RetryError<E>>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;

        loop {
            match work(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(
                            operation = %operation,
                            attempts = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        tracing::error!(
                            operation = %operation,
                            error_class = error.error_class(),
                            error = %error,
                            "Non-retryable error"
                        );
                        return Err(RetryError::Fatal {
                            attempts: attempt + 1,
                            error,
                        });
                    }

                    if attempt >= self.policy.max_retries {
                        tracing::error!(
                            operation = %operation,
                            max_retries = self.policy.max_retries,
                            error = %error,
                            "Max retries exceeded"
                        );
                        return Err(RetryError::Exhausted {
                            attempts: attempt + 1,
                            error,
                        });
                    }

                    attempt += 1;
                    let delay = self.policy.backoff.delay_for(attempt);
                    tracing::warn!(
                        operation = %operation,
                        attempt = attempt,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error_class = error.error_class(),
                        "Retrying after failure"
                    );
                    metrics::record_retry(operation);
                    sleep(delay).await;
                }
            }
        }
    }
}
