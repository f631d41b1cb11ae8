//! Configuration system for the customer service.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `config.toml` file
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `CUSTOMERS_SERVER_HOST` - Server bind address
//! - `CUSTOMERS_SERVER_PORT` - Server port
//! - `CUSTOMERS_DATABASE_URL` - Database connection URL (falls back to `DATABASE_URL`)
//! - `CUSTOMERS_AUTH_TOKEN` - Shared secret expected in the `Authorization` header
//! - `CUSTOMERS_LOGGING_ENABLED` - Install the tracing subscriber
//! - `CUSTOMERS_LOG_LEVEL` - Log level (trace, debug, info, warn, error)

use config::Config;
use serde::Deserialize;
use std::env;
use std::sync::OnceLock;

use crate::errors::{CustomerError, CustomerResult};

/// Global configuration singleton.
static CONFIG: OnceLock<CustomerConfig> = OnceLock::new();

/// Shared secret used when none is configured.
pub const DEFAULT_AUTH_TOKEN: &str = "token2019";

/// Database used when no connection string is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://customers.db";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Shared-secret authentication
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2019,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string; the scheme picks the backend
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Backend named by the connection string scheme, if recognised.
    pub fn backend(&self) -> Option<&'static str> {
        if self.url.starts_with("sqlite:") {
            Some("sqlite")
        } else if self.url.starts_with("postgres://") || self.url.starts_with("postgresql://") {
            Some("postgres")
        } else {
            None
        }
    }
}

/// Shared-secret authentication configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Value the `Authorization` header must carry
    pub token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_AUTH_TOKEN.to_string(),
        }
    }
}

impl AuthConfig {
    /// Whether the built-in default secret is still in use.
    pub fn uses_default_token(&self) -> bool {
        self.token == DEFAULT_AUTH_TOKEN
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}

fn config_error(e: config::ConfigError) -> CustomerError {
    CustomerError::ConfigError(e.to_string())
}

/// `CUSTOMERS_SERVER_PORT`, if set. A value that is not a port is an error.
fn env_port() -> CustomerResult<Option<i64>> {
    match env::var("CUSTOMERS_SERVER_PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .map(|port| Some(i64::from(port)))
            .map_err(|e| {
                CustomerError::ConfigError(format!(
                    "CUSTOMERS_SERVER_PORT '{raw}' is not a port: {e}"
                ))
            }),
        Err(_) => Ok(None),
    }
}

impl CustomerConfig {
    /// Load configuration from file and environment.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. `config.toml` file (optional)
    /// 3. Environment variables
    ///
    /// This always builds a fresh value; use [`get_config`] for the cached one.
    pub fn load() -> CustomerResult<Self> {
        let database_url = env::var("CUSTOMERS_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()
            .filter(|url| !url.is_empty());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")
            .map_err(config_error)?
            .set_default("server.port", 2019)
            .map_err(config_error)?
            .set_default("database.url", DEFAULT_DATABASE_URL)
            .map_err(config_error)?
            .set_default("auth.token", DEFAULT_AUTH_TOKEN)
            .map_err(config_error)?
            .set_default("logging.enabled", true)
            .map_err(config_error)?
            .set_default("logging.level", "info")
            .map_err(config_error)?
            // Load from config.toml (optional)
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .set_override_option("server.host", env::var("CUSTOMERS_SERVER_HOST").ok())
            .map_err(config_error)?
            .set_override_option("server.port", env_port()?)
            .map_err(config_error)?
            .set_override_option("database.url", database_url)
            .map_err(config_error)?
            .set_override_option("auth.token", env::var("CUSTOMERS_AUTH_TOKEN").ok())
            .map_err(config_error)?
            .set_override_option(
                "logging.enabled",
                env::var("CUSTOMERS_LOGGING_ENABLED")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok()),
            )
            .map_err(config_error)?
            .set_override_option("logging.level", env::var("CUSTOMERS_LOG_LEVEL").ok())
            .map_err(config_error)?;

        let settings = builder
            .build()
            .map_err(|e| CustomerError::ConfigError(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| CustomerError::ConfigError(format!("failed to deserialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CustomerResult<()> {
        if self.server.port == 0 {
            return Err(CustomerError::ConfigError(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.database.backend().is_none() {
            return Err(CustomerError::ConfigError(format!(
                "database.url must start with 'sqlite:', 'postgres://' or 'postgresql://', got '{}'",
                self.database.url
            )));
        }

        if self.auth.token.is_empty() {
            return Err(CustomerError::ConfigError(
                "auth.token cannot be empty".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(CustomerError::ConfigError(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// This loads the configuration on first access and caches it.
/// Returns an error if configuration loading or validation fails.
pub fn get_config() -> CustomerResult<&'static CustomerConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = CustomerConfig::load()?;
    config.validate()?;

    // Another thread may have won the race; either value is fine.
    let _ = CONFIG.set(config);

    CONFIG
        .get()
        .ok_or_else(|| CustomerError::ConfigError("configuration was not initialised".to_string()))
}

/// Initialize configuration explicitly.
///
/// Call this early so configuration errors surface before the server starts.
pub fn init_config() -> CustomerResult<&'static CustomerConfig> {
    get_config()
}
