//! Application configuration.
//!
//! All settings come from the environment (optionally seeded from a
//! `.env` file by the binary). The admin API key deliberately has no
//! default; starting without one is a configuration error.

use std::env;
use std::net::SocketAddr;

/// Default connection string when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/warden";

/// Default listen address when `LISTEN_ADDR` is not set.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The required admin API key is missing or empty.
    #[error(
        "ADMIN_API_KEY environment variable is required; set it in your .env file or environment"
    )]
    MissingAdminKey,

    /// An environment value failed to parse or validate.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// The offending setting.
        name: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// Runtime configuration for the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection string for the PostgreSQL store.
    pub database_url: String,

    /// Bearer credential required on management endpoints.
    pub admin_api_key: String,

    /// Address the HTTP listener binds to.
    pub listen_addr: SocketAddr,

    /// Maximum connections in the database pool.
    pub pool_size: u32,

    /// Default tracing filter, overridable via `RUST_LOG`.
    pub log_filter: String,
}

impl AppConfig {
    /// Loads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `ADMIN_API_KEY` is missing or empty, or if any
    /// value fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin_api_key = env::var("ADMIN_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingAdminKey)?;

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .map_err(|err| ConfigError::Invalid {
                name: "LISTEN_ADDR",
                message: format!("{err}"),
            })?;

        let pool_size = match env::var("PG_POOL_SIZE") {
            Ok(value) => value.parse().map_err(|err| ConfigError::Invalid {
                name: "PG_POOL_SIZE",
                message: format!("{err}"),
            })?,
            Err(_) => 5,
        };

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            admin_api_key,
            listen_addr,
            pool_size,
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the loaded values.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::Invalid {
                name: "DATABASE_URL",
                message: "must not be empty".to_string(),
            });
        }
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "PG_POOL_SIZE",
                message: "must be > 0".to_string(),
            });
        }
        if self.listen_addr.port() == 0 {
            return Err(ConfigError::Invalid {
                name: "LISTEN_ADDR",
                message: "port must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
