//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::Duration;

use crate::outbound::persistence::DbPool;
use crate::settings::{AppSettings, SettingsError};

/// Builder-style configuration for creating the HTTP server.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) token_ttl: Duration,
    pub(crate) seed_demo_users: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: Vec<u8>, token_ttl: Duration) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            token_ttl,
            seed_demo_users: false,
            db_pool: None,
        }
    }

    /// Derive a configuration from loaded settings. The pool is attached
    /// separately once it has been built.
    ///
    /// # Errors
    ///
    /// Propagates [`SettingsError`] for an invalid bind address, TTL, or a
    /// missing secret in release builds.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(
            settings.bind_addr()?,
            settings.jwt_secret()?,
            settings.token_ttl()?,
        )
        .with_demo_seeding(settings.seed_demo_users))
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, every repository port uses its Diesel adapter.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Create the demo accounts during startup.
    #[must_use]
    pub fn with_demo_seeding(mut self, enabled: bool) -> Self {
        self.seed_demo_users = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether a database pool is attached.
    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
