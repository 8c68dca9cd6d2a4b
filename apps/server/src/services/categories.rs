//! Category listing.

use crate::db::CategoryRepository;
use crate::models::Category;
use crate::Result;

#[derive(Debug, Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }
}
