//! Catalog Seeder - fills the database with deterministic demo data.

use anyhow::Context;
use clap::Parser;

use catalog::db::seed::{self, SeedOptions};
use catalog::{config::Config, db, logging};

#[derive(Debug, Parser)]
#[command(name = "catalog-seed", about = "Seed the catalog with demo data")]
struct Args {
    /// Target number of users (existing rows count toward the target)
    #[arg(long, default_value_t = 1000)]
    users: u32,

    /// Target number of products
    #[arg(long, default_value_t = 1000)]
    products: u32,

    /// RNG seed; the same seed produces the same data
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let pool = db::connect_pool(&config.database)
        .await
        .context("Failed to connect database pool")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    seed::run(
        &pool,
        SeedOptions {
            users: args.users,
            products: args.products,
            rng_seed: args.seed,
        },
    )
    .await
    .context("Seeding failed")?;

    Ok(())
}
