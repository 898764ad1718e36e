//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ResilienceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied after parsing, before validation.
pub fn load_config(path: &Path) -> Result<ResilienceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ResilienceConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn config_from_env() -> Result<ResilienceConfig, ConfigError> {
    let mut config = ResilienceConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Override individual settings from the process environment.
///
/// Unparseable values are ignored in favor of the configured value.
fn apply_env_overrides(config: &mut ResilienceConfig) {
    if let Some(v) = env_parse::<u64>("HTTP_CLIENT_TIMEOUT") {
        config.http_client.timeout_secs = v;
    }
    if let Some(v) = env_parse::<u64>("HTTP_CLIENT_CONNECT_TIMEOUT") {
        config.http_client.connect_timeout_secs = v;
    }
    if let Some(v) = env_parse::<u32>("HTTP_CLIENT_MAX_RETRIES") {
        config.http_client.max_retries = v;
    }
    if let Some(v) = env_parse::<u64>("HTTP_CLIENT_RETRY_DELAY_MS") {
        config.http_client.retry_base_delay_ms = v;
    }
    if let Some(v) = env_parse::<u64>("RPC_CLIENT_TIMEOUT_MS") {
        config.rpc_client.default_timeout_ms = v;
    }
    if let Some(v) = env_parse::<u32>("RPC_CLIENT_MAX_RETRIES") {
        config.rpc_client.max_retries = v;
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key = %key, value = %raw, "Ignoring unparseable environment override");
                None
            }
        },
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let dir = std::env::temp_dir().join("resilient_clients_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("valid.toml");
        fs::write(
            &path,
            r#"
            [http_client]
            timeout_secs = 10
            max_retries = 5

            [circuit_breaker]
            failure_threshold = 2
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.http_client.timeout_secs, 10);
        assert_eq!(config.http_client.max_retries, 5);
        assert_eq!(config.circuit_breaker.failure_threshold, 2);
        // Untouched sections keep defaults
        assert_eq!(config.rpc_client.default_timeout_ms, 2000);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = std::env::temp_dir().join("resilient_clients_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("invalid.toml");
        fs::write(
            &path,
            r#"
            [circuit_breaker]
            failure_threshold = 0
            "#,
        )
        .unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("failure_threshold"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/resilience.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
