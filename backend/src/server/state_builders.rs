//! Builders for HTTP state ports and startup seeding.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::{DemoAccountSeeder, DemoSeedOutcome, DemoSeedingError};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselDisputeRepository, DieselFleetRepository, DieselLoadRepository,
    DieselMessageRepository, DieselPaymentRepository, DieselReportingRepository,
    DieselTripRepository, DieselUserRepository,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Repository ports backed by Diesel adapters over `pool`.
fn diesel_ports(
    pool: &DbPool,
    security: (Arc<Argon2PasswordHasher>, Arc<JwtTokenService>),
    clock: Arc<dyn Clock>,
) -> HttpStatePorts {
    let (hasher, tokens) = security;
    HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        fleet: Arc::new(DieselFleetRepository::new(pool.clone())),
        loads: Arc::new(DieselLoadRepository::new(pool.clone())),
        trips: Arc::new(DieselTripRepository::new(pool.clone())),
        payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
        messages: Arc::new(DieselMessageRepository::new(pool.clone())),
        disputes: Arc::new(DieselDisputeRepository::new(pool.clone())),
        reporting: Arc::new(DieselReportingRepository::new(pool.clone())),
        hasher,
        tokens,
        clock,
    }
}

/// Repository ports sharing one in-memory store.
fn memory_ports(
    store: &MemoryStore,
    security: (Arc<Argon2PasswordHasher>, Arc<JwtTokenService>),
    clock: Arc<dyn Clock>,
) -> HttpStatePorts {
    let (hasher, tokens) = security;
    HttpStatePorts {
        users: Arc::new(store.clone()),
        fleet: Arc::new(store.clone()),
        loads: Arc::new(store.clone()),
        trips: Arc::new(store.clone()),
        payments: Arc::new(store.clone()),
        messages: Arc::new(store.clone()),
        disputes: Arc::new(store.clone()),
        reporting: Arc::new(store.clone()),
        hasher,
        tokens,
        clock,
    }
}

/// Build port implementations based on configuration.
///
/// Uses Diesel repositories when a pool is configured, otherwise a fresh
/// in-memory store whose contents live as long as the process.
pub(crate) fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let security = (
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtTokenService::new(
            &config.jwt_secret,
            config.token_ttl,
            clock.clone(),
        )),
    );
    match &config.db_pool {
        Some(pool) => diesel_ports(pool, security, clock),
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            memory_ports(&MemoryStore::new(), security, clock)
        }
    }
}

/// Wrap the services built from `ports` for actix.
pub(crate) fn build_http_state(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}

/// Create the demo accounts when enabled. Existing accounts are kept.
///
/// # Errors
///
/// Propagates [`DemoSeedingError`] from the seeder.
pub(crate) async fn seed_demo_accounts(
    config: &ServerConfig,
    ports: &HttpStatePorts,
) -> Result<Option<DemoSeedOutcome>, DemoSeedingError> {
    if !config.seed_demo_users {
        info!(reason = "disabled", "demo account seeding skipped");
        return Ok(None);
    }
    let seeder = DemoAccountSeeder::new(
        ports.users.clone(),
        ports.hasher.clone(),
        ports.clock.clone(),
    );
    let outcome = seeder.seed().await?;
    info!(
        created = outcome.created,
        skipped = outcome.skipped,
        "demo account seeding finished"
    );
    Ok(Some(outcome))
}
