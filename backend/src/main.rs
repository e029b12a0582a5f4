//! Backend entry-point: loads settings, prepares storage and serves the API.

use actix_web::web;
use color_eyre::eyre::{Context as _, Result};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cuceifoods::config::AppSettings;
use cuceifoods::inbound::http::health::HealthState;
use cuceifoods::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use cuceifoods::outbound::uploads::CapStdUploadStore;
use cuceifoods::server::{ServerConfig, create_server};

/// Build the pool and bring the schema up to date.
async fn connect_database(settings: &AppSettings, database_url: &str) -> Result<DbPool> {
    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        run_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    let config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size());
    DbPool::new(config)
        .await
        .wrap_err("failed to build the database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let upload_dir = settings.upload_dir();
    let uploads = CapStdUploadStore::open(&upload_dir)
        .wrap_err_with(|| format!("failed to open upload directory {}", upload_dir.display()))?;

    let mut config =
        ServerConfig::new(bind_addr, uploads).with_email_policy(settings.email_policy());
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = connect_database(&settings, url).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; data will be kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
