use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{SearchConfig, DEFAULT_API_VERSION};
use crate::transport::DEFAULT_TIMEOUT_SECS;

/// Runtime configuration for the command-line driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote search service
    pub service: ServiceConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the embedded defaults, then `path` if it exists, then `FSS__*`
    /// environment variables
    pub fn load_from(path: &str) -> std::result::Result<Self, config::ConfigError> {
        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(path).required(false))
            // Override with environment variables (prefix: FSS)
            .add_source(
                config::Environment::with_prefix("FSS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Resolve the query key, preferring an explicit value over the
    /// environment variable named by `query_key_env`
    pub fn query_key(&self) -> Result<String> {
        if let Some(key) = self.service.query_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.service.query_key_env).map_err(|_| {
            AppError::Configuration(format!(
                "No query key configured and {} is not set",
                self.service.query_key_env
            ))
        })
    }

    /// Build the in-state service configuration
    pub fn search_config(&self) -> Result<SearchConfig> {
        if self.service.index.is_empty() {
            return Err(AppError::Configuration("service.index is required".to_string()));
        }
        if self.service.name.is_empty() && self.service.endpoint.is_none() {
            return Err(AppError::Configuration(
                "service.name or service.endpoint is required".to_string(),
            ));
        }

        let mut config = SearchConfig::new(
            self.service.name.clone(),
            self.service.index.clone(),
            self.query_key()?,
        );
        if let Some(endpoint) = &self.service.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name (first label of `{name}.search.windows.net`)
    #[serde(default)]
    pub name: String,

    /// Index to query
    #[serde(default)]
    pub index: String,

    /// Scheme and host replacing the default service host
    pub endpoint: Option<String>,

    /// Query key; takes precedence over `query_key_env`
    pub query_key: Option<String>,

    /// Environment variable holding the query key
    #[serde(default = "default_query_key_env")]
    pub query_key_env: String,

    /// Service API version
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_query_key_env() -> String {
    "FSS_QUERY_KEY".to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_filter() -> String {
    "faceted_search_store=info".to_string()
}
