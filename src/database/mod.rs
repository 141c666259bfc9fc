use std::sync::Arc;

use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;
pub mod utils;

pub use memory::MemoryStore;
pub use store::{OvertimeStore, PgStore};

/// URL scheme that selects the in-process store instead of Postgres.
pub const MEMORY_URL_PREFIX: &str = "memory://";

pub async fn init_database(database_url: &str, max_connections: u32) -> Result<PgPool> {
    log::info!("Connecting to database (max {} connections)", max_connections);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // Run migrations
    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}

pub async fn init_store(config: &Config) -> Result<Arc<dyn OvertimeStore>> {
    if config.uses_memory_store() {
        log::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = init_database(&config.database_url, config.database_max_connections).await?;
    Ok(Arc::new(PgStore::new(pool)))
}
