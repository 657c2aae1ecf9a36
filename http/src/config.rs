//! API configuration
//!
//! Resolves the base URL and request timeout for [`HttpTodoApi`](crate::HttpTodoApi).
//!
//! # Environment variables
//!
//! - `TODOS_ENV`: `development` (default) or `production`
//! - `TODOS_API_URL`: overrides the environment's base URL
//! - `TODOS_API_TIMEOUT_SECS`: request timeout in seconds (default 30)
//!
//! # Example
//!
//! ```
//! use todo_sections_http::config::{ApiConfig, Environment};
//!
//! let config = ApiConfig::for_environment(Environment::Production);
//! assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
//! ```

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable selecting the deployment environment
pub const ENV_VAR: &str = "TODOS_ENV";
/// Environment variable overriding the base URL
pub const URL_VAR: &str = "TODOS_API_URL";
/// Environment variable setting the request timeout
pub const TIMEOUT_VAR: &str = "TODOS_API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid environment value
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    /// A variable was set but could not be parsed
    #[error("Failed to parse {var}: {message}")]
    ParseError {
        /// Variable name
        var: &'static str,
        /// Parse failure
        message: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Development backend
    #[default]
    Development,
    /// Production backend
    Production,
}

impl Environment {
    /// Get environment from string
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] if the string is not a
    /// known environment name.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }

    /// Base URL of this environment's backend
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Development => "https://mock.typicode.com",
            Self::Production => "https://jsonplaceholder.typicode.com",
        }
    }

    /// Check if this is production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Selected environment
    pub environment: Environment,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Defaults for an environment
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            base_url: environment.base_url().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point at an explicit base URL (tests, local servers)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or the result
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is malformed or the result
    /// fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENV_VAR)
            .map(|value| Environment::parse(&value))
            .transpose()?
            .unwrap_or_default();

        let mut config = Self::for_environment(environment);

        if let Some(url) = lookup(URL_VAR) {
            config = config.with_base_url(url);
        }

        if let Some(secs) = lookup(TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::ParseError {
                    var: TIMEOUT_VAR,
                    message: e.to_string(),
                }
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a non-HTTP base URL or a
    /// zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError("timeout must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
