//! Faktura Server — application entry point.
//!
//! Boots infrastructure only: the transport layer (REST API) is not
//! part of this repository yet.

use anyhow::Context;
use faktura_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn db_config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: env_or("FAKTURA_DB_URL", &defaults.url),
        namespace: env_or("FAKTURA_DB_NAMESPACE", &defaults.namespace),
        database: env_or("FAKTURA_DB_DATABASE", &defaults.database),
        username: env_or("FAKTURA_DB_USERNAME", &defaults.username),
        password: env_or("FAKTURA_DB_PASSWORD", &defaults.password),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("faktura=info".parse()?),
        )
        .json()
        .init();

    tracing::info!("Starting faktura server...");

    let config = db_config_from_env();
    let manager = DbManager::connect(&config)
        .await
        .context("failed to connect to SurrealDB")?;
    faktura_db::run_migrations(manager.client())
        .await
        .context("failed to run migrations")?;

    tracing::info!("Database ready.");

    // TODO: start the REST API once the transport layer lands.

    Ok(())
}
