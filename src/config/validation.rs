//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds >= 1, timeouts > 0)
//! - Check the log level is one tracing understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ResilienceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ResilienceConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ResilienceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut fail = |field: &str, message: &str| {
        errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    let cb = &config.circuit_breaker;
    if cb.failure_threshold == 0 {
        fail("circuit_breaker.failure_threshold", "must be at least 1");
    }
    if cb.success_threshold == 0 {
        fail("circuit_breaker.success_threshold", "must be at least 1");
    }
    if cb.open_timeout_ms == 0 {
        fail("circuit_breaker.open_timeout_ms", "must be greater than 0");
    }

    let http = &config.http_client;
    if http.timeout_secs == 0 {
        fail("http_client.timeout_secs", "must be greater than 0");
    }
    if http.connect_timeout_secs == 0 {
        fail("http_client.connect_timeout_secs", "must be greater than 0");
    }
    if http.retry_base_delay_ms == 0 {
        fail("http_client.retry_base_delay_ms", "must be greater than 0");
    }
    if let Some(name) = &http.breaker_name {
        if name.is_empty() {
            fail("http_client.breaker_name", "must not be empty when set");
        }
    }

    let rpc = &config.rpc_client;
    if rpc.default_timeout_ms == 0 {
        fail("rpc_client.default_timeout_ms", "must be greater than 0");
    }
    if rpc.retry_base_delay_ms == 0 {
        fail("rpc_client.retry_base_delay_ms", "must be greater than 0");
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        fail(
            "observability.log_level",
            "must be one of trace, debug, info, warn, error",
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ResilienceConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_thresholds_rejected() {
        let mut config = ResilienceConfig::default();
        config.circuit_breaker.failure_threshold = 0;
        config.circuit_breaker.success_threshold = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "circuit_breaker.failure_threshold");
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = ResilienceConfig::default();
        config.http_client.timeout_secs = 0;
        config.rpc_client.default_timeout_ms = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_empty_breaker_name_rejected() {
        let mut config = ResilienceConfig::default();
        config.http_client.breaker_name = Some(String::new());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("breaker_name"));
    }
}
