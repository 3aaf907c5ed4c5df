//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FLEETFLOW_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// Release builds refuse to start without a signing secret.
    #[error("FLEETFLOW_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    /// Token lifetimes must lie between one hour and a year.
    #[error("token TTL must be between 1 and {max} hours, got {hours}", max = MAX_TOKEN_TTL_HOURS)]
    TokenTtl { hours: i64 },
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLEETFLOW")]
pub struct AppSettings {
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
    /// Create the demo accounts at startup.
    #[ortho_config(default = false)]
    pub seed_demo_users: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Token lifetime, defaulting to 24 hours.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TokenTtl`] for values outside one hour to
    /// one year.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
            return Err(SettingsError::TokenTtl { hours });
        }
        Duration::try_hours(hours).ok_or(SettingsError::TokenTtl { hours })
    }

    /// Pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Bytes used to sign bearer tokens.
    ///
    /// Debug builds without a configured secret get a random one, so tokens
    /// do not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] in release builds when no
    /// secret is configured.
    pub fn jwt_secret(&self) -> Result<Vec<u8>, SettingsError> {
        self.resolve_jwt_secret(cfg!(debug_assertions))
    }

    fn resolve_jwt_secret(&self, allow_ephemeral: bool) -> Result<Vec<u8>, SettingsError> {
        if let Some(secret) = self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(secret.as_bytes().to_vec());
        }
        if !allow_ephemeral {
            return Err(SettingsError::MissingJwtSecret);
        }
        warn!("using temporary JWT secret (dev only); tokens will not survive a restart");
        let bytes: [u8; EPHEMERAL_SECRET_BYTES] = rand::random();
        Ok(hex::encode(bytes).into_bytes())
    }
}
