//! Product handlers: search and single-product lookup.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde::Serialize;

use crate::db::search::{SearchRequest, SearchResult};
use crate::models::{Product, ProductSummary};
use crate::state::AppState;
use crate::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<ProductSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        let total_pages = result.total_pages();
        Self {
            items: result.items,
            page: result.params.page,
            page_size: result.params.page_size,
            total: result.total,
            total_pages,
        }
    }
}

/// GET /api/products
pub async fn search(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<SearchResponse>> {
    let request = parse_search_request(query.as_deref().unwrap_or_default());
    let result = state.products.search(&request).await?;
    Ok(Json(SearchResponse::from(result)))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id: i64 = id
        .parse()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| crate::Error::Validation("invalid product id".to_string()))?;

    let product = state.products.get_by_id(id).await?;
    Ok(Json(product))
}

/// Decode the raw query string into a [`SearchRequest`]. `category` is
/// multi-valued; for every other key the first occurrence wins.
fn parse_search_request(query: &str) -> SearchRequest {
    let mut request = SearchRequest::default();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "q" => set_first(&mut request.q, value),
            "category" => request.categories.push(value),
            "minPrice" => set_first(&mut request.min_price, value),
            "maxPrice" => set_first(&mut request.max_price, value),
            "inStock" => set_first(&mut request.in_stock, value),
            "sort" => set_first(&mut request.sort, value),
            "method" => set_first(&mut request.method, value),
            "page" => set_first(&mut request.page, value),
            "pageSize" => set_first(&mut request.page_size, value),
            _ => {}
        }
    }

    request
}

fn set_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_valued_categories() {
        let request = parse_search_request("category=1&category=2&q=shoes");
        assert_eq!(request.categories, vec!["1", "2"]);
        assert_eq!(request.q.as_deref(), Some("shoes"));
    }

    #[test]
    fn first_occurrence_wins_for_scalar_params() {
        let request = parse_search_request("page=2&page=9");
        assert_eq!(request.page.as_deref(), Some("2"));
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let request = parse_search_request("debug=1&q=hub");
        assert_eq!(request.q.as_deref(), Some("hub"));
    }

    #[test]
    fn percent_encoding_is_decoded() {
        let request = parse_search_request("q=red%20shoes");
        assert_eq!(request.q.as_deref(), Some("red shoes"));
    }

    #[test]
    fn empty_query_string_yields_default_request() {
        let request = parse_search_request("");
        assert!(request.q.is_none());
        assert!(request.categories.is_empty());
    }
}
