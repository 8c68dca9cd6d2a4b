//! Database layer - pool setup, migrations, repositories and search engine

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub mod categories;
pub mod products;
pub mod search;
pub mod seed;
pub mod users;

pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use search::{SearchEngine, SearchParams, SearchRequest};
pub use users::UserRepository;

/// Connect a bounded connection pool: capped maximum, a floor of always-warm
/// connections, and a maximum connection lifetime to force rotation.
pub async fn connect_pool(config: &DatabaseConfig) -> crate::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max_size)
        .min_connections(config.pool_min_size)
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(crate::Error::Database)?;

    Ok(pool)
}

/// Apply embedded migrations (idempotent, ordered by version).
pub async fn run_migrations(pool: &PgPool) -> crate::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| crate::Error::Internal(format!("migration failed: {e}")))?;
    Ok(())
}
