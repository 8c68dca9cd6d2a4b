//! Product search: parameter normalization, text query compilation,
//! predicate composition and result assembly.

pub mod engine;
pub mod params;
pub mod query_builder;
pub mod text_query;

pub use engine::{SearchEngine, SearchResult};
pub use params::{SearchParams, SearchRequest, SortDirection, SortKey};
