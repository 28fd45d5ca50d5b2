//! API server configuration.

use chrono::Duration;
use parento_core::auth::jwt::{DEFAULT_ACCESS_TTL_SECS, TokenConfig};
use parento_core::auth::password::DEFAULT_BCRYPT_COST;
use parento_core::auth::refresh::REFRESH_TTL_HOURS;
use thiserror::Error;

/// Configuration errors. All fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("{0} is not a valid number: {1}")]
    InvalidNumber(&'static str, String),
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// JWT signing secret. Required; rotating it invalidates all
    /// outstanding access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in hours.
    pub refresh_ttl_hours: i64,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

fn env_i64(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(name, raw)),
        Err(_) => Ok(default),
    }
}

fn env_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(name, raw)),
        Err(_) => Ok(default),
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                  | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:3100`                 |
    /// | `DATABASE_URL`            | `postgres://localhost:5432/parento` |
    /// | `JWT_SECRET`              | required, non-empty              |
    /// | `ACCESS_TOKEN_TTL_SECS`   | 900                              |
    /// | `REFRESH_TOKEN_TTL_HOURS` | 168                              |
    /// | `BCRYPT_COST`             | 10                               |
    ///
    /// A missing or empty `JWT_SECRET` is a startup failure, never a
    /// per-request one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/parento".into()),
            jwt_secret,
            access_ttl_secs: env_i64("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
            refresh_ttl_hours: env_i64("REFRESH_TOKEN_TTL_HOURS", REFRESH_TTL_HOURS)?,
            bcrypt_cost: env_u32("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
        })
    }

    /// Token-service configuration derived from this config.
    pub fn token_config(&self) -> TokenConfig {
        let mut config = TokenConfig::new(self.jwt_secret.clone());
        config.access_ttl = Duration::seconds(self.access_ttl_secs);
        config
    }

    /// Refresh token lifetime as a duration.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::hours(self.refresh_ttl_hours)
    }
}
