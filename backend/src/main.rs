//! Backend entry-point: loads settings, prepares the database, and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mealbook::inbound::http::health::HealthState;
use mealbook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerSettings, build_http_state, create_server};

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

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

    let settings = ServerSettings::load().map_err(startup_error)?;
    let database_url = settings.database_url().map_err(startup_error)?;
    let bind_addr = settings.bind_addr().map_err(startup_error)?;

    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .map_err(startup_error)?;
    } else {
        info!("skipping database migrations");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(startup_error)?;
    let http_state = build_http_state(&pool, &settings).map_err(startup_error)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, bind_addr)?;
    info!(%bind_addr, "listening");
    server.await
}
