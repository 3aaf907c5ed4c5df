//! Backend entry-point: loads settings, prepares storage, and serves the API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fleetflow::inbound::http::health::HealthState;
use fleetflow::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use fleetflow::server::{ServerConfig, create_server};
use fleetflow::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| {
        std::io::Error::other(format!("failed to load configuration: {e}"))
    })?;
    let mut config = ServerConfig::from_settings(&settings)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    if let Some(database_url) = settings.database_url() {
        run_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let pool_config =
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }

    info!(
        bind_addr = %config.bind_addr(),
        database = config.uses_database(),
        "starting server"
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
