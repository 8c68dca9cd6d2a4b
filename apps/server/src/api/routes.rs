//! Catalog API route table.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{auth, categories, products};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog browsing (unauthenticated)
        .route("/products", get(products::search))
        .route("/products/:id", get(products::get_by_id))
        .route("/categories", get(categories::list))
        // Accounts
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/google", get(auth::google_start))
        .route("/auth/google/callback", get(auth::google_callback))
}
