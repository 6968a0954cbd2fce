//! Store API client configuration.
//!
//! Loaded from environment variables with fallback to development defaults.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the store API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Root the endpoint paths are appended to, e.g. `http://localhost:3000/api`
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Sent as `User-Agent`
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("medwear/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Development defaults pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpConfig {
            base_url: base_url.into(),
            ..HttpConfig::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `MEDWEAR_API_URL` | `http://localhost:3000/api` |
    /// | `MEDWEAR_API_TIMEOUT_SECS` | `30` |
    /// | `MEDWEAR_API_CONNECT_TIMEOUT_SECS` | `10` |
    /// | `MEDWEAR_API_USER_AGENT` | `medwear/<version>` |
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = HttpConfig::default();

        let config = HttpConfig {
            base_url: env::var("MEDWEAR_API_URL").unwrap_or(defaults.base_url),

            timeout_secs: parse_var("MEDWEAR_API_TIMEOUT_SECS", defaults.timeout_secs)?,

            connect_timeout_secs: parse_var(
                "MEDWEAR_API_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,

            user_agent: env::var("MEDWEAR_API_USER_AGENT").unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the client could never work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired("MEDWEAR_API_URL".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("MEDWEAR_API_URL".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("MEDWEAR_API_TIMEOUT_SECS".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_var(name: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HttpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("medwear/"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(HttpConfig::new("").validate().is_err());
        assert!(HttpConfig::new("ftp://store").validate().is_err());

        let mut config = HttpConfig::new("https://store.example/api");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
