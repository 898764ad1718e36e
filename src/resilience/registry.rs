//! Process-wide circuit breaker registry.
//!
//! # Responsibilities
//! - Map dependency names to their circuit breaker, one instance per name
//! - Create breakers lazily on first reference
//!
//! # Design Decisions
//! - One mutex guards the map, held only for lookup/insert; guarded
//!   calls run entirely outside it, so dependencies never serialize
//!   each other
//! - Clients take a registry handle (global by default) so tests can
//!   run against isolated instances

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::CircuitBreakerConfig;
use crate::resilience::circuit_breaker::CircuitBreaker;

/// Concurrency-safe name → breaker mapping.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the breaker registered under `name`, creating it with
    /// `config` if absent.
    ///
    /// Lookup and creation are a single atomic check-and-set; concurrent
    /// callers with the same name observe the same instance. An existing
    /// breaker keeps the configuration it was created with.
    pub fn get_or_create(
        &self,
        name: &str,
        config: &CircuitBreakerConfig,
    ) -> Arc<CircuitBreaker> {
        let mut breakers = self.lock();
        breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(breaker = %name, "Creating circuit breaker");
                Arc::new(CircuitBreaker::new(name, config.clone()))
            })
            .clone()
    }

    /// Look up a breaker without creating it.
    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.lock().get(name).cloned()
    }

    /// Number of registered breakers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry holds no breakers.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CircuitBreaker>>> {
        self.breakers.lock().expect("breaker registry mutex poisoned")
    }
}

/// Process-scoped registry shared by all clients that are not handed an
/// explicit instance. Created lazily, lives for the process lifetime.
pub fn global() -> &'static CircuitBreakerRegistry {
    static REGISTRY: OnceLock<CircuitBreakerRegistry> = OnceLock::new();
    REGISTRY.get_or_init(CircuitBreakerRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::circuit_breaker::BreakerState;

    #[test]
    fn test_same_name_returns_same_instance() {
        let registry = CircuitBreakerRegistry::new();
        let config = CircuitBreakerConfig::default();

        let a = registry.get_or_create("svc-a", &config);
        let b = registry.get_or_create("svc-a", &config);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_names_get_distinct_breakers() {
        let registry = CircuitBreakerRegistry::new();
        let config = CircuitBreakerConfig::default();

        let a = registry.get_or_create("svc-a", &config);
        let b = registry.get_or_create("svc-b", &config);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_does_not_create() {
        let registry = CircuitBreakerRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_existing_breaker_keeps_original_config() {
        let registry = CircuitBreakerRegistry::new();
        let strict = CircuitBreakerConfig {
            failure_threshold: 1,
            ..Default::default()
        };

        let a = registry.get_or_create("svc", &strict);
        a.record_failure();
        assert_eq!(a.state(), BreakerState::Open);

        // A later caller with laxer settings still sees the same breaker
        let b = registry.get_or_create("svc", &CircuitBreakerConfig::default());
        assert_eq!(b.state(), BreakerState::Open);
    }

    #[test]
    fn test_concurrent_get_or_create_yields_one_instance() {
        let registry = Arc::new(CircuitBreakerRegistry::new());
        let config = CircuitBreakerConfig::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let config = config.clone();
                std::thread::spawn(move || registry.get_or_create("shared", &config))
            })
            .collect();

        let breakers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(registry.len(), 1);
        for pair in breakers.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }
}
