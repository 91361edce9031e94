//! Service entry-point: loads settings, prepares PostgreSQL and serves the
//! user API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use users_api::inbound::http::health::HealthState;
use users_api::outbound::persistence::{DbPool, PoolConfig, run_migrations};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn prepare_database(database_url: &str) -> Result<DbPool> {
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to connect to the database")?;

    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&url))
        .await
        .map_err(|e| eyre!("migration task panicked: {e}"))?
        .wrap_err("failed to apply database migrations")?;
    Ok(pool)
}

async fn run() -> Result<()> {
    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load configuration")?;
    let pool = prepare_database(&settings.database_url).await?;
    info!("connected to the database");

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_addr()).with_db_pool(pool);
    let server = create_server(health_state, config)
        .wrap_err_with(|| format!("failed to bind {}", settings.bind_addr()))?;

    info!(addr = %settings.bind_addr(), "server listening");
    server.await.wrap_err("server terminated with an error")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    run()
        .await
        .inspect_err(|report| error!(error = %format!("{report:#}"), "users-api stopped"))
}
