//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{self, CategoryRepository, ProductRepository, SearchEngine, UserRepository};
use crate::services::{auth::AuthService, categories::CategoryService, products::ProductService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub products: ProductService,
    pub categories: CategoryService,
    pub auth: AuthService,
}

#[derive(Debug, Clone, Copy)]
pub struct AppStateOptions {
    pub run_migrations: bool,
}

impl Default for AppStateOptions {
    fn default() -> Self {
        Self {
            run_migrations: true,
        }
    }
}

impl AppState {
    pub async fn new(config: Config) -> crate::Result<Self> {
        Self::new_with_options(config, AppStateOptions::default()).await
    }

    pub async fn new_with_options(config: Config, options: AppStateOptions) -> crate::Result<Self> {
        let db_pool = db::connect_pool(&config.database).await?;

        if options.run_migrations {
            db::run_migrations(&db_pool).await?;
            tracing::info!("Migrations applied");
        }

        let products = ProductService::new(
            ProductRepository::new(db_pool.clone()),
            SearchEngine::new(db_pool.clone()),
        );
        let categories = CategoryService::new(CategoryRepository::new(db_pool.clone()));
        let auth = AuthService::new(UserRepository::new(db_pool.clone()));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            products,
            categories,
            auth,
        })
    }
}
