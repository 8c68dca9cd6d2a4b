//! Category handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::models::Category;
use crate::state::AppState;
use crate::Result;

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub items: Vec<Category>,
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> Result<Json<ListCategoriesResponse>> {
    let items = state.categories.list().await?;
    Ok(Json(ListCategoriesResponse { items }))
}
