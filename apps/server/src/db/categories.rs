//! Category reference data.

use sqlx::{PgPool, Row};

use crate::models::Category;
use crate::Result;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories, ordered by name then id for a stable listing.
    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(crate::Error::Database)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(Category {
                id: row.try_get("id").map_err(crate::Error::Database)?,
                name: row.try_get("name").map_err(crate::Error::Database)?,
            });
        }
        Ok(out)
    }
}
