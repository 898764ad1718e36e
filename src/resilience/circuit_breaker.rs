//! Circuit breaker for downstream dependency protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: testing if the dependency recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= failure_threshold
//! Open → Half-Open: after open_timeout elapses, next call probes
//! Half-Open → Closed: success_count >= success_threshold
//! Half-Open → Open: probe failure (failure_count is not reset on
//!                   Half-Open entry, so one failure re-trips)
//! ```
//!
//! # Design Decisions
//! - Per-dependency breaker instance, one lock per breaker
//! - The lock guards only counter/state bookkeeping; the guarded call
//!   runs with no lock held
//! - Fail fast in Open state, single-failure re-trip in Half-Open

use std::future::Future;
use std::sync::Mutex;
use std::time::Instant;

use thiserror::Error;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    /// Stable lowercase name for logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

/// Rejection produced when the circuit is open and the cool-down has not
/// elapsed. The guarded call is not invoked.
#[derive(Debug, Clone, Error)]
#[error("circuit breaker {name} is open")]
pub struct BreakerOpenError {
    /// Name of the rejecting breaker.
    pub name: String,
}

/// Failure surfaced by [`CircuitBreaker::guard`]: either the breaker
/// rejected the call, or the call itself failed (after bookkeeping).
#[derive(Debug, Error)]
pub enum GuardError<E> {
    #[error(transparent)]
    Open(#[from] BreakerOpenError),

    #[error("{0}")]
    Inner(E),
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    failure_count: u32,
    success_count: u32,
    last_failure_at: Option<Instant>,
}

/// A named circuit breaker guarding one logical dependency.
///
/// All counters and the state live behind a single mutex held only for
/// bookkeeping, never across the guarded call itself.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a breaker in the Closed state.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_at: None,
            }),
        }
    }

    /// Breaker name (registry key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Current consecutive-failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    /// Execute `work` under breaker protection.
    ///
    /// An Open breaker whose cool-down has not elapsed rejects without
    /// invoking `work`. Otherwise the outcome of `work` feeds the
    /// breaker's bookkeeping and is returned unchanged: `guard` never
    /// swallows the underlying failure.
    pub async fn guard<T, E, F, Fut>(&self, work: F) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.try_acquire()?;

        match work().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                self.record_failure();
                Err(GuardError::Inner(error))
            }
        }
    }

    /// Ask whether a call may proceed right now.
    ///
    /// Handles the Open → Half-Open transition when the cool-down has
    /// elapsed; the caller then runs as the probe.
    pub fn try_acquire(&self) -> Result<(), BreakerOpenError> {
        let mut inner = self.lock();

        match inner.state {
            BreakerState::Closed | BreakerState::HalfOpen => Ok(()),
            BreakerState::Open => match inner.last_failure_at {
                Some(at) if at.elapsed() < self.config.open_timeout() => {
                    metrics::record_breaker_rejection(&self.name);
                    Err(BreakerOpenError {
                        name: self.name.clone(),
                    })
                }
                _ => {
                    // Cool-down elapsed: probe the dependency.
                    // failure_count is deliberately left untouched.
                    inner.state = BreakerState::HalfOpen;
                    inner.success_count = 0;
                    tracing::info!(breaker = %self.name, "Circuit breaker attempting reset");
                    metrics::record_breaker_transition(&self.name, BreakerState::HalfOpen);
                    Ok(())
                }
            },
        }
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        let mut inner = self.lock();

        match inner.state {
            BreakerState::Closed => {
                inner.failure_count = 0;
            }
            BreakerState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    inner.state = BreakerState::Closed;
                    inner.failure_count = 0;
                    tracing::info!(breaker = %self.name, "Circuit breaker closed");
                    metrics::record_breaker_transition(&self.name, BreakerState::Closed);
                }
            }
            // A success landing while Open (e.g. a probe raced a
            // concurrent re-trip) does not move the state machine.
            BreakerState::Open => {}
        }
    }

    /// Record a failed call.
    pub fn record_failure(&self) {
        let mut inner = self.lock();

        inner.failure_count += 1;
        inner.last_failure_at = Some(Instant::now());

        if inner.failure_count >= self.config.failure_threshold
            && inner.state != BreakerState::Open
        {
            inner.state = BreakerState::Open;
            tracing::error!(
                breaker = %self.name,
                failures = inner.failure_count,
                "Circuit breaker opened due to failures"
            );
            metrics::record_breaker_transition(&self.name, BreakerState::Open);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        self.inner.lock().expect("circuit breaker mutex poisoned")
    }
}
