//! Product lookup and search orchestration.

use crate::db::search::{SearchRequest, SearchResult};
use crate::db::{ProductRepository, SearchEngine};
use crate::models::Product;
use crate::Result;

#[derive(Debug, Clone)]
pub struct ProductService {
    products: ProductRepository,
    engine: SearchEngine,
}

impl ProductService {
    pub fn new(products: ProductRepository, engine: SearchEngine) -> Self {
        Self { products, engine }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Product> {
        self.products.get_by_id(id).await
    }

    /// Normalize the raw request and run the search. Normalization is total,
    /// so the only failure mode here is the store itself.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let params = request.normalize();
        self.engine.search(&params).await
    }
}
