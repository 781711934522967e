//! Warehouse API configuration module.
//!
//! Settings are layered, lowest priority first:
//!
//! ```text
//! built-in defaults
//!      │
//!      ▼
//! warehouse.toml          (optional; path from WAREHOUSE_CONFIG)
//!      │
//!      ▼
//! WAREHOUSE_* variables   (WAREHOUSE_PORT=8080, WAREHOUSE_DATABASE_PATH=...)
//! ```
//!
//! `.env` files are loaded into the environment by `main` before this runs.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::warn;
use warehouse_db::DbConfig;

/// Signing secret used when none is configured. Development only.
pub const DEV_ACCESS_TOKEN_SECRET: &str = "warehouse-dev-secret-change-in-production";

/// Default config file looked up when `WAREHOUSE_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "warehouse.toml";

/// Warehouse API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway store)
    pub database_path: String,

    /// Connection pool size
    pub database_max_connections: u32,

    /// HMAC secret for signing access tokens
    pub access_token_secret: String,

    /// Access token lifetime in seconds
    pub access_token_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from the config file and `WAREHOUSE_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("WAREHOUSE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::from_sources(&file, Environment::with_prefix("WAREHOUSE"))
    }

    /// Build configuration from an explicit file path and environment source.
    pub fn from_sources(file: &str, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("database_path", "./warehouse.db")?
            .set_default("database_max_connections", 5)?
            .set_default("access_token_secret", DEV_ACCESS_TOKEN_SECRET)?
            .set_default("access_token_lifetime_secs", 86_400)?
            .add_source(File::with_name(file).required(false))
            .add_source(env.prefix_separator("_").try_parsing(true))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;

        if config.access_token_secret == DEV_ACCESS_TOKEN_SECRET {
            warn!("Using the development access token secret; set WAREHOUSE_ACCESS_TOKEN_SECRET");
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "access_token_secret".to_string(),
            ));
        }

        if self.access_token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "access_token_lifetime_secs".to_string(),
            ));
        }

        if self.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database_max_connections".to_string(),
            ));
        }

        Ok(())
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the product store.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path).max_connections(self.database_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Environment::with_prefix("WAREHOUSE").source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_sources("does-not-exist.toml", env(&[])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.database_path, "./warehouse.db");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.access_token_lifetime_secs, 86_400);
        assert_eq!(config.access_token_secret, DEV_ACCESS_TOKEN_SECRET);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_sources(
            "does-not-exist.toml",
            env(&[
                ("WAREHOUSE_PORT", "8080"),
                ("WAREHOUSE_DATABASE_PATH", ":memory:"),
                ("WAREHOUSE_ACCESS_TOKEN_SECRET", "s3cret"),
                ("WAREHOUSE_ACCESS_TOKEN_LIFETIME_SECS", "60"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.access_token_secret, "s3cret");
        assert_eq!(config.access_token_lifetime_secs, 60);
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let result = ApiConfig::from_sources(
            "does-not-exist.toml",
            env(&[("WAREHOUSE_ACCESS_TOKEN_LIFETIME_SECS", "0")]),
        );

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_empty_secret() {
        let result = ApiConfig::from_sources(
            "does-not-exist.toml",
            env(&[("WAREHOUSE_ACCESS_TOKEN_SECRET", " ")]),
        );

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
