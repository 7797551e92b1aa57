//! Client configuration settings
//!
//! Defines the configuration structures and their loading logic

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// amoCRM connection configuration
    pub crm: CrmConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// amoCRM connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Account base URL, e.g. `https://example.amocrm.com`
    pub base_url: String,
    /// User login (email)
    pub login: String,
    /// User API key sent as `USER_HASH`
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Settings {
    /// Create a new configuration instance from the environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            crm: CrmConfig {
                base_url: std::env::var("AMOCRM_BASE_URL")
                    .context("AMOCRM_BASE_URL environment variable not set")?,
                login: std::env::var("AMOCRM_LOGIN")
                    .context("AMOCRM_LOGIN environment variable not set")?,
                api_key: std::env::var("AMOCRM_API_KEY")
                    .context("AMOCRM_API_KEY environment variable not set")?,
                timeout: get_env_or_default("AMOCRM_TIMEOUT", &DEFAULT_TIMEOUT.to_string())
                    .parse()
                    .context("Invalid timeout value")?,
                user_agent: get_env_or_default("AMOCRM_USER_AGENT", &default_user_agent()),
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        self.crm.validate()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

impl CrmConfig {
    /// Configuration with default timeout and user agent
    pub fn new(
        base_url: impl Into<String>,
        login: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            login: login.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        self.url()?;

        if self.login.trim().is_empty() {
            anyhow::bail!("Login cannot be empty");
        }

        if self.api_key.is_empty() {
            anyhow::bail!("API key cannot be empty");
        }

        if self.api_key.contains(char::is_whitespace) {
            anyhow::bail!("API key cannot contain whitespace characters");
        }

        if self.timeout == 0 {
            anyhow::bail!("Timeout value cannot be 0");
        }

        Ok(())
    }

    /// Parsed base URL
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Invalid base URL format, should start with 'http'");
        }
        if url.host_str().is_none() {
            anyhow::bail!("Base URL has no host: {}", self.base_url);
        }
        Ok(url)
    }
}

impl fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CrmConfig {
        CrmConfig::new("https://acme.amocrm.com", "manager@acme.com", "0123456789abcdef")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("amocrm-client/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = config();
        config.base_url = "ftp://acme.amocrm.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_credentials() {
        let mut c = config();
        c.login = "  ".to_string();
        assert!(c.validate().is_err());

        let mut c = config();
        c.api_key = String::new();
        assert!(c.validate().is_err());

        let mut c = config();
        c.api_key = "abc def".to_string();
        assert!(c.validate().is_err());

        assert!(config().with_timeout(0).validate().is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("0123456789abcdef"));
        assert!(printed.contains("manager@acme.com"));
    }

    #[test]
    fn test_logging_validation() {
        let mut settings = Settings {
            crm: config(),
            logging: LoggingConfig::default(),
        };
        assert!(settings.validate().is_ok());

        settings.logging.format = "yaml".to_string();
        assert!(settings.validate().is_err());
    }
}
