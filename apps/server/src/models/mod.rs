//! Domain types shared across the API, services and repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared reference data; read-only from the search engine's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub position: i32,
}

/// Full product as returned by the single-product lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub rating: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub images: Vec<ProductImage>,
    pub categories: Vec<Category>,
}

/// Denormalized-for-read row of a search result page. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
