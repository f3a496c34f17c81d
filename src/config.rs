//! Run configuration.
//!
//! The provider credential and run settings are read once at startup, from
//! environment variables and CLI flags, and stay fixed for the whole process.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default Scale API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.scale.com/v1";

/// Default directory the report is written to.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Default (and maximum) number of tasks requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest page the task listing endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur while building the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for a QC run.
#[derive(Clone)]
pub struct QcConfig {
    /// Provider API key, sent as the basic-auth username.
    pub api_key: String,
    /// Provider API base URL.
    pub api_base: String,
    /// Directory the report file is written into.
    pub output_dir: PathBuf,
    /// Tasks requested per listing page.
    pub page_size: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for QcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QcConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("output_dir", &self.output_dir)
            .field("page_size", &self.page_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl QcConfig {
    /// Create a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SCALE_API_KEY`: API key (required)
    /// - `SCALE_API_BASE`: API base URL (defaults to `https://api.scale.com/v1`)
    /// - `LABEL_QC_OUTPUT_DIR`: report directory (defaults to `./output`)
    /// - `LABEL_QC_PAGE_SIZE`: tasks per listing page (defaults to 100)
    /// - `LABEL_QC_TIMEOUT_SECS`: request timeout (defaults to 60)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `SCALE_API_KEY` is not set, and
    /// `ConfigError::InvalidValue` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("SCALE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("SCALE_API_KEY".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(base) = env::var("SCALE_API_BASE") {
            config.api_base = base;
        }
        if let Ok(dir) = env::var("LABEL_QC_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(page_size) = parse_env::<usize>("LABEL_QC_PAGE_SIZE")? {
            config.page_size = page_size;
        }
        if let Some(secs) = parse_env::<u64>("LABEL_QC_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the report directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Override the listing page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "API key must not be empty".to_string(),
            ));
        }
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "API base URL must not be empty".to_string(),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "page_size".to_string(),
                message: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{}' is not a valid number", raw),
            }),
        Err(_) => Ok(None),
    }
}
