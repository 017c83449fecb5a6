//! Backend entry-point: configuration, persistence wiring, and HTTP serving.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::demo::seed_demo_data_on_startup;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, SessionSettings};
use backend::outbound::persistence::{DbPool, PoolConfig, run_startup_migrations};
use backend::settings::AppSettings;
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|err| {
        std::io::Error::other(format!("invalid bind address '{}': {err}", settings.bind_addr()))
    })?;

    let SessionSettings { key, cookie_secure, same_site } =
        SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;

    let db_pool = match settings.database_url.as_deref() {
        Some(database_url) => {
            run_startup_migrations(database_url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(std::io::Error::other)?;
            Some(pool)
        }
        None => {
            info!("no database configured; serving the built-in demo dataset");
            None
        }
    };

    seed_demo_data_on_startup(settings.seed_demo_data, db_pool.as_ref())
        .await
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(key, cookie_secure, same_site, bind_addr);
    let config = match db_pool {
        Some(pool) => config.with_db_pool(pool),
        None => config,
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "petstore backend listening");
    server.await
}
