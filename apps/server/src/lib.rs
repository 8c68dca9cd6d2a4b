//! Catalog browsing API
//!
//! An e-commerce catalog server with:
//! - Full-text product search with filtering, sorting and pagination
//! - Category listing and single-product lookup
//! - Cookie-session authentication with Google OAuth account linking
//! - Embedded migrations and deterministic demo seeding

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
