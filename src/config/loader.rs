//! Configuration loading from disk and the environment.
//!
//! Environment overrides are resolved here, once, at process start. Handlers
//! never read ambient environment state.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ProbeConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProbeConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Apply environment-variable overrides on top of a loaded config.
///
/// Recognized variables: `API_PROBE_TOKEN`, `VERSION`, `GIT_COMMIT`,
/// `BUILD_TIME`.
pub fn apply_env_overrides(config: &mut ProbeConfig) {
    if let Ok(token) = env::var("API_PROBE_TOKEN") {
        config.auth.probe_token = token;
    }
    if let Ok(version) = env::var("VERSION") {
        config.build.version = version;
    }
    if let Ok(commit) = env::var("GIT_COMMIT") {
        config.build.commit = commit;
    }
    if let Ok(date) = env::var("BUILD_TIME") {
        config.build.date = date;
    }
}

/// Validate a configuration, returning the first problem found.
pub fn validate_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "invalid bind address: {}",
            config.listener.bind_address
        )));
    }
    if config.rate_limit.limit == 0 {
        return Err(ConfigError::Validation(
            "rate_limit.limit must be greater than zero".to_string(),
        ));
    }
    if config.rate_limit.window_secs == 0 {
        return Err(ConfigError::Validation(
            "rate_limit.window_secs must be greater than zero".to_string(),
        ));
    }
    if config.payload.max_bytes == 0 {
        return Err(ConfigError::Validation(
            "payload.max_bytes must be greater than zero".to_string(),
        ));
    }
    if config.payload.default_speed_bytes > config.payload.max_bytes {
        return Err(ConfigError::Validation(
            "payload.default_speed_bytes exceeds payload.max_bytes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ProbeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = ProbeConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut config = ProbeConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parses_partial_toml() {
        let config: ProbeConfig = toml::from_str(
            r#"
            [auth]
            probe_token = "secret"

            [rate_limit]
            limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.probe_token, "secret");
        assert_eq!(config.rate_limit.limit, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.payload.max_bytes, 104_857_600);
    }
}
