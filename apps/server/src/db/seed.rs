//! Demo-data seeding.
//!
//! Idempotent top-up seeding: base categories are ensured by name, the demo
//! user always exists, and users/products are only inserted up to the
//! requested counts. A fixed RNG seed makes repeated runs deterministic.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;

use crate::Result;

const BASE_CATEGORIES: &[&str] = &[
    "Laptop",
    "Phone",
    "Audio",
    "Wearables",
    "Gaming",
    "Accessories",
    "Camera",
    "Networking",
    "Storage",
    "Home",
];

const ADJECTIVES: &[&str] = &[
    "Ultra", "Pro", "Air", "Max", "Mini", "Prime", "Edge", "Nova", "Zen", "Core",
];

const NOUNS: &[&str] = &[
    "Speaker",
    "Headphones",
    "Laptop",
    "Phone",
    "Mouse",
    "Keyboard",
    "Router",
    "SSD",
    "Camera",
    "Monitor",
];

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "Password123!";

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub users: u32,
    pub products: u32,
    pub rng_seed: u64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            users: 1000,
            products: 1000,
            rng_seed: 42,
        }
    }
}

pub async fn run(pool: &PgPool, options: SeedOptions) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(options.rng_seed);

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(crate::Error::Database)?;
    let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .map_err(crate::Error::Database)?;

    let mut tx = pool.begin().await.map_err(crate::Error::Database)?;

    let category_ids = ensure_categories(&mut tx).await?;

    if user_count < i64::from(options.users) {
        let missing = options.users - user_count as u32;
        seed_users(&mut tx, &mut rng, missing).await?;
    }

    if product_count < i64::from(options.products) {
        let missing = options.products - product_count as u32;
        seed_products(&mut tx, &mut rng, missing, &category_ids).await?;
    }

    tx.commit().await.map_err(crate::Error::Database)?;

    tracing::info!(
        users = options.users,
        products = options.products,
        "Seeding complete"
    );
    Ok(())
}

async fn ensure_categories(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> Result<Vec<i64>> {
    for name in BASE_CATEGORIES {
        sqlx::query("INSERT INTO categories(name) VALUES($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut **tx)
            .await
            .map_err(crate::Error::Database)?;
    }

    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM categories ORDER BY id ASC")
        .fetch_all(&mut **tx)
        .await
        .map_err(crate::Error::Database)?;
    Ok(ids)
}

async fn seed_users(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    rng: &mut StdRng,
    count: u32,
) -> Result<()> {
    let hash = crate::services::auth::hash_password(DEMO_PASSWORD)?;

    sqlx::query(
        "INSERT INTO users(email, password_hash) VALUES ($1, $2) \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(DEMO_EMAIL)
    .bind(&hash)
    .execute(&mut **tx)
    .await
    .map_err(crate::Error::Database)?;

    // All seeded users share the demo hash; hashing per row is pointlessly
    // slow for fixture data.
    for i in 0..count {
        let email = format!("user{:04}_{}@example.com", i + 1, rng.gen_range(0..1_000_000));
        sqlx::query(
            "INSERT INTO users(email, password_hash) VALUES ($1, $2) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(&email)
        .bind(&hash)
        .execute(&mut **tx)
        .await
        .map_err(crate::Error::Database)?;
    }

    Ok(())
}

async fn seed_products(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    rng: &mut StdRng,
    count: u32,
    category_ids: &[i64],
) -> Result<()> {
    let now = Utc::now();

    for i in 0..count {
        let name = format!(
            "{} {} {:04}",
            ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
            NOUNS[rng.gen_range(0..NOUNS.len())],
            i + 1
        );
        let description = format!(
            "Seeded product {:04}, a {} for everyday use.",
            i + 1,
            NOUNS[rng.gen_range(0..NOUNS.len())].to_lowercase()
        );

        let rating = 2.5 + rng.gen::<f64>() * 2.5;
        let in_stock = rng.gen_range(0..100) < 70;
        let created_at = now - Duration::hours(i64::from(rng.gen_range(0..180 * 24)));
        let price = 10.0 + rng.gen::<f64>() * 990.0;

        let product_id: i64 = sqlx::query_scalar(
            "INSERT INTO products(name, price, description, rating, in_stock, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&name)
        .bind(price)
        .bind(&description)
        .bind(rating)
        .bind(in_stock)
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(crate::Error::Database)?;

        let image_count: i32 = rng.gen_range(1..=4);
        for position in 1..=image_count {
            let url = format!("https://picsum.photos/seed/p{product_id}_{position}/800/600");
            sqlx::query(
                "INSERT INTO product_images(product_id, url, position) VALUES ($1, $2, $3) \
                 ON CONFLICT (product_id, position) DO NOTHING",
            )
            .bind(product_id)
            .bind(&url)
            .bind(position)
            .execute(&mut **tx)
            .await
            .map_err(crate::Error::Database)?;
        }

        let category_count: usize = rng.gen_range(1..=3);
        let mut chosen: Vec<i64> = Vec::with_capacity(category_count);
        while chosen.len() < category_count {
            let id = category_ids[rng.gen_range(0..category_ids.len())];
            if chosen.contains(&id) {
                continue;
            }
            chosen.push(id);
            sqlx::query(
                "INSERT INTO product_categories(product_id, category_id) VALUES ($1, $2) \
                 ON CONFLICT (product_id, category_id) DO NOTHING",
            )
            .bind(product_id)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(crate::Error::Database)?;
        }
    }

    Ok(())
}
