//! Service layer - request orchestration on top of the repositories.

pub mod auth;
pub mod categories;
pub mod products;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use products::ProductService;
