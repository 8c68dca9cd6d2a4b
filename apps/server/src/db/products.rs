//! Single-product reads.

use sqlx::{PgPool, Row};

use crate::models::{Category, Product, ProductImage};
use crate::Result;

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a product with its images (by position) and categories (by id).
    /// Returns `Error::NotFound` when no such product exists.
    pub async fn get_by_id(&self, id: i64) -> Result<Product> {
        let row = sqlx::query(
            "SELECT id, name, price, description, rating, in_stock, created_at \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(crate::Error::Database)?
        .ok_or_else(|| crate::Error::NotFound(format!("product {id}")))?;

        let mut product = Product {
            id: row.try_get("id").map_err(crate::Error::Database)?,
            name: row.try_get("name").map_err(crate::Error::Database)?,
            price: row.try_get("price").map_err(crate::Error::Database)?,
            description: row.try_get("description").map_err(crate::Error::Database)?,
            rating: row.try_get("rating").map_err(crate::Error::Database)?,
            in_stock: row.try_get("in_stock").map_err(crate::Error::Database)?,
            created_at: row.try_get("created_at").map_err(crate::Error::Database)?,
            images: Vec::new(),
            categories: Vec::new(),
        };

        let image_rows = sqlx::query(
            "SELECT url, position FROM product_images \
             WHERE product_id = $1 ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::Error::Database)?;

        for row in &image_rows {
            product.images.push(ProductImage {
                url: row.try_get("url").map_err(crate::Error::Database)?,
                position: row.try_get("position").map_err(crate::Error::Database)?,
            });
        }

        let category_rows = sqlx::query(
            "SELECT c.id, c.name FROM categories c \
             JOIN product_categories pc ON pc.category_id = c.id \
             WHERE pc.product_id = $1 ORDER BY c.id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::Error::Database)?;

        for row in &category_rows {
            product.categories.push(Category {
                id: row.try_get("id").map_err(crate::Error::Database)?,
                name: row.try_get("name").map_err(crate::Error::Database)?,
            });
        }

        Ok(product)
    }
}
