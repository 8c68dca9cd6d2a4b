//! Search execution and result assembly.
//!
//! Two round-trips per search, on one acquired connection: a scalar count of
//! distinct matching products, then a page fetch. The page query returns
//! fan-out rows (one per image × category combination); the assembler
//! collapses them by product identity before anything leaves this module.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};

use super::params::SearchParams;
use super::query_builder::{BindValue, QueryBuilder};
use crate::models::{Category, ProductSummary};
use crate::Result;

/// Assembled page plus the parameters that were actually applied, echoed
/// back so the caller can reconcile what was used.
#[derive(Debug)]
pub struct SearchResult {
    pub items: Vec<ProductSummary>,
    pub total: i64,
    pub params: SearchParams,
}

impl SearchResult {
    pub fn total_pages(&self) -> i64 {
        (self.total + self.params.page_size - 1) / self.params.page_size
    }
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    pool: PgPool,
}

impl SearchEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a search with already-normalized parameters.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        let builder = QueryBuilder::from_params(params);
        let mut conn = self.pool.acquire().await.map_err(crate::Error::Database)?;

        let total = self.count_total(&mut conn, &builder).await?;
        let rows = self.fetch_page(&mut conn, &builder).await?;
        let items = collapse_rows(rows)?;

        Ok(SearchResult {
            items,
            total,
            params: params.clone(),
        })
    }

    async fn count_total(&self, conn: &mut PgConnection, builder: &QueryBuilder) -> Result<i64> {
        let sql = builder.count_sql();
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in builder.binds() {
            query = match value {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::BigIntArray(vs) => query.bind(vs.clone()),
                BindValue::Double(v) => query.bind(*v),
                BindValue::Bool(v) => query.bind(*v),
            };
        }

        let total = query
            .fetch_one(&mut *conn)
            .await
            .map_err(crate::Error::Database)?;
        Ok(total)
    }

    async fn fetch_page(
        &self,
        conn: &mut PgConnection,
        builder: &QueryBuilder,
    ) -> Result<Vec<PageRow>> {
        let sql = builder.page_sql();
        let mut query = sqlx::query(&sql);
        for value in builder.binds() {
            query = match value {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::BigIntArray(vs) => query.bind(vs.clone()),
                BindValue::Double(v) => query.bind(*v),
                BindValue::Bool(v) => query.bind(*v),
            };
        }

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(crate::Error::Database)?;

        rows.iter().map(PageRow::decode).collect()
    }
}

/// One raw fan-out row of the page query.
#[derive(Debug, Clone)]
pub(crate) struct PageRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub image_position: Option<i32>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}

impl PageRow {
    fn decode(row: &PgRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id").map_err(crate::Error::Database)?,
            name: row.try_get("name").map_err(crate::Error::Database)?,
            price: row.try_get("price").map_err(crate::Error::Database)?,
            rating: row.try_get("rating").map_err(crate::Error::Database)?,
            in_stock: row.try_get("in_stock").map_err(crate::Error::Database)?,
            created_at: row.try_get("created_at").map_err(crate::Error::Database)?,
            image_url: row.try_get("image_url").map_err(crate::Error::Database)?,
            image_position: row
                .try_get("image_position")
                .map_err(crate::Error::Database)?,
            category_id: row.try_get("category_id").map_err(crate::Error::Database)?,
            category_name: row
                .try_get("category_name")
                .map_err(crate::Error::Database)?,
        })
    }
}

/// Collapse fan-out rows into one summary per product, preserving the order
/// in which products first appear (the page order). The thumbnail is the
/// image with the lowest position; categories are deduplicated by id and
/// serialized in ascending id order.
pub(crate) fn collapse_rows(rows: Vec<PageRow>) -> Result<Vec<ProductSummary>> {
    struct Assembly {
        summary: ProductSummary,
        thumbnail: Option<(i32, String)>,
        category_ids: Vec<i64>,
    }

    let mut order: Vec<i64> = Vec::new();
    let mut by_id: HashMap<i64, Assembly> = HashMap::new();

    for row in rows {
        let entry = by_id.entry(row.id).or_insert_with(|| {
            order.push(row.id);
            Assembly {
                summary: ProductSummary {
                    id: row.id,
                    name: row.name.clone(),
                    price: row.price,
                    rating: row.rating,
                    in_stock: row.in_stock,
                    created_at: row.created_at,
                    thumbnail: None,
                    categories: Vec::new(),
                },
                thumbnail: None,
                category_ids: Vec::new(),
            }
        });

        if let (Some(position), Some(url)) = (row.image_position, row.image_url) {
            match &entry.thumbnail {
                Some((best, _)) if *best <= position => {}
                _ => entry.thumbnail = Some((position, url)),
            }
        }

        if let (Some(id), Some(name)) = (row.category_id, row.category_name) {
            if !entry.category_ids.contains(&id) {
                entry.category_ids.push(id);
                entry.summary.categories.push(Category { id, name });
            }
        }
    }

    let mut items = Vec::with_capacity(order.len());
    for id in order {
        let mut assembly = by_id
            .remove(&id)
            .ok_or_else(|| crate::Error::Internal("lost page row during collapse".to_string()))?;
        assembly.summary.thumbnail = assembly.thumbnail.map(|(_, url)| url);
        assembly.summary.categories.sort_by_key(|c| c.id);
        items.push(assembly.summary);
    }
    Ok(items)
}
