//! SQL query builder for catalog searches.
//!
//! Composes the dynamic set of optional predicates (text match, category
//! membership, price bounds, stock) as an ordered list of
//! `(clause, bind value)` pairs. Both the count query and the page query are
//! rendered from that single list, so placeholder indexes can never drift
//! from bind positions. Appending a predicate never reorders the ones
//! already appended.

use super::params::{SearchParams, SortDirection, SortKey};
use super::text_query::compile_prefix_query;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    BigIntArray(Vec<i64>),
    Double(f64),
    Bool(bool),
}

#[derive(Debug)]
pub struct QueryBuilder {
    predicates: Vec<String>,
    binds: Vec<BindValue>,
    /// Placeholder index of the compiled tsquery, when a text filter is active.
    tsquery_idx: Option<usize>,
    sort: SortKey,
    method: SortDirection,
    limit: i64,
    offset: i64,
}

impl QueryBuilder {
    /// Compose predicates from normalized parameters, in stable order:
    /// text, category, min price, max price, stock.
    pub fn from_params(params: &SearchParams) -> Self {
        let mut builder = Self {
            predicates: Vec::new(),
            binds: Vec::new(),
            tsquery_idx: None,
            sort: params.sort,
            method: params.method,
            limit: params.limit(),
            offset: params.offset(),
        };

        let tsquery = compile_prefix_query(&params.q);
        if !tsquery.is_empty() {
            let idx = builder.push_bind(BindValue::Text(tsquery));
            builder.predicates.push(format!(
                "p.search_vector @@ to_tsquery('simple', ${idx})"
            ));
            builder.tsquery_idx = Some(idx);
        }

        // Multi-select categories are a union filter: match any selected
        // category. An empty set means no filter, never "exclude everything".
        if !params.category_ids.is_empty() {
            let idx = builder.push_bind(BindValue::BigIntArray(params.category_ids.clone()));
            builder.predicates.push(format!(
                "EXISTS (SELECT 1 FROM product_categories pc \
                 WHERE pc.product_id = p.id AND pc.category_id = ANY(${idx}))"
            ));
        }

        if let Some(min) = params.min_price {
            let idx = builder.push_bind(BindValue::Double(min));
            builder.predicates.push(format!("p.price >= ${idx}"));
        }

        if let Some(max) = params.max_price {
            let idx = builder.push_bind(BindValue::Double(max));
            builder.predicates.push(format!("p.price <= ${idx}"));
        }

        if let Some(in_stock) = params.in_stock {
            let idx = builder.push_bind(BindValue::Bool(in_stock));
            builder.predicates.push(format!("p.in_stock = ${idx}"));
        }

        builder
    }

    fn push_bind(&mut self, value: BindValue) -> usize {
        self.binds.push(value);
        self.binds.len()
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }

    /// Count of distinct matching products. The category filter is an EXISTS
    /// subquery rather than a join, so `COUNT(*)` never counts fan-out rows.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM products p{}", self.where_clause())
    }

    /// Page query: the inner subquery selects one row per matching product,
    /// ordered and paginated; the outer query joins images and categories,
    /// producing fan-out rows the assembler collapses by product identity.
    pub fn page_sql(&self) -> String {
        format!(
            "SELECT p.id, p.name, p.price, p.rating, p.in_stock, p.created_at, \
             pi.url AS image_url, pi.position AS image_position, \
             c.id AS category_id, c.name AS category_name \
             FROM (SELECT p.id, {rank} AS rank FROM products p{filter} \
             ORDER BY {inner_order} LIMIT {limit} OFFSET {offset}) page \
             JOIN products p ON p.id = page.id \
             LEFT JOIN product_images pi ON pi.product_id = p.id \
             LEFT JOIN product_categories pc ON pc.product_id = p.id \
             LEFT JOIN categories c ON c.id = pc.category_id \
             ORDER BY {outer_order}, pi.position ASC NULLS LAST, c.id ASC",
            rank = self.rank_expr(),
            filter = self.where_clause(),
            inner_order = self.order_by("p", "rank"),
            outer_order = self.order_by("p", "page.rank"),
            limit = self.limit,
            offset = self.offset,
        )
    }

    /// Relevance score. Defined as zero when no text predicate is active.
    fn rank_expr(&self) -> String {
        match self.tsquery_idx {
            Some(idx) => format!("ts_rank_cd(p.search_vector, to_tsquery('simple', ${idx}))"),
            None => "0::real".to_string(),
        }
    }

    /// Ordering for one query context. The direction applies to the primary
    /// basis only; the trailing `id ASC` tie-break keeps pagination stable
    /// across identical sort-key values.
    fn order_by(&self, product: &str, rank_column: &str) -> String {
        let dir = self.method.sql();
        let basis = match self.sort {
            SortKey::Relevance => rank_column.to_string(),
            SortKey::Price => format!("{product}.price"),
            SortKey::CreatedAt => format!("{product}.created_at"),
            SortKey::Rating => format!("{product}.rating"),
        };
        format!("{basis} {dir}, {product}.id ASC")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::search::params::SearchRequest;

    fn params_from(req: SearchRequest) -> SearchParams {
        req.normalize()
    }

    fn full_request() -> SearchRequest {
        SearchRequest {
            q: Some("red shoes".into()),
            categories: vec!["1".into(), "2".into()],
            min_price: Some("10".into()),
            max_price: Some("99.99".into()),
            in_stock: Some("true".into()),
            sort: Some("price".into()),
            method: Some("asc".into()),
            page: Some("2".into()),
            page_size: Some("10".into()),
        }
    }

    #[test]
    fn no_filters_yields_no_where_clause() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest::default()));
        assert_eq!(b.count_sql(), "SELECT COUNT(*) FROM products p");
        assert!(b.binds().is_empty());
        assert!(!b.page_sql().contains("WHERE"));
    }

    #[test]
    fn placeholder_indexes_match_bind_positions() {
        let b = QueryBuilder::from_params(&params_from(full_request()));
        assert_eq!(b.binds().len(), 5);
        let sql = b.count_sql();
        for idx in 1..=5 {
            assert!(sql.contains(&format!("${idx}")), "missing ${idx} in {sql}");
        }
        assert!(matches!(b.binds()[0], BindValue::Text(_)));
        assert!(matches!(b.binds()[1], BindValue::BigIntArray(_)));
        assert!(matches!(b.binds()[2], BindValue::Double(_)));
        assert!(matches!(b.binds()[3], BindValue::Double(_)));
        assert!(matches!(b.binds()[4], BindValue::Bool(_)));
    }

    #[test]
    fn indexes_stay_aligned_when_leading_predicates_are_absent() {
        // No text, no categories: min price must still land on $1.
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            min_price: Some("5".into()),
            in_stock: Some("false".into()),
            ..SearchRequest::default()
        }));
        assert_eq!(
            b.binds(),
            &[BindValue::Double(5.0), BindValue::Bool(false)]
        );
        let sql = b.count_sql();
        assert!(sql.contains("p.price >= $1"));
        assert!(sql.contains("p.in_stock = $2"));
    }

    #[test]
    fn count_and_page_share_predicates_and_binds() {
        let b = QueryBuilder::from_params(&params_from(full_request()));
        let count = b.count_sql();
        let page = b.page_sql();
        for pred in ["to_tsquery", "ANY($2)", "p.price >= $3", "p.price <= $4", "p.in_stock = $5"]
        {
            assert!(count.contains(pred), "count missing {pred}");
            assert!(page.contains(pred), "page missing {pred}");
        }
    }

    #[test]
    fn empty_category_set_means_no_category_predicate() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            q: Some("mouse".into()),
            ..SearchRequest::default()
        }));
        assert!(!b.count_sql().contains("product_categories"));
    }

    #[test]
    fn text_predicate_absent_for_punctuation_only_query() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            q: Some("!!! ???".into()),
            ..SearchRequest::default()
        }));
        assert!(!b.count_sql().contains("to_tsquery"));
        assert!(b.binds().is_empty());
        // Rank degrades to the constant zero.
        assert!(b.page_sql().contains("0::real AS rank"));
    }

    #[test]
    fn ordering_always_ends_in_id_tiebreak() {
        for sort in ["relevance", "price", "created_at", "rating"] {
            let b = QueryBuilder::from_params(&params_from(SearchRequest {
                q: Some("hub".into()),
                sort: Some(sort.into()),
                ..SearchRequest::default()
            }));
            let sql = b.page_sql();
            assert!(sql.contains("p.id ASC"), "sort {sort} lost the tie-break");
        }
    }

    #[test]
    fn direction_applies_to_primary_basis_only() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            sort: Some("price".into()),
            method: Some("desc".into()),
            ..SearchRequest::default()
        }));
        let sql = b.page_sql();
        assert!(sql.contains("ORDER BY p.price DESC, p.id ASC"));
    }

    #[test]
    fn relevance_orders_by_rank() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            q: Some("laptop".into()),
            ..SearchRequest::default()
        }));
        let sql = b.page_sql();
        assert!(sql.contains("ORDER BY rank DESC, p.id ASC"));
        assert!(sql.contains("ORDER BY page.rank DESC, p.id ASC"));
        assert!(sql.contains("ts_rank_cd"));
    }

    #[test]
    fn pagination_is_rendered_from_normalized_params() {
        let b = QueryBuilder::from_params(&params_from(full_request()));
        let sql = b.page_sql();
        assert!(sql.contains("LIMIT 10 OFFSET 10"));
    }

    #[test]
    fn tsquery_bind_is_shared_between_predicate_and_rank() {
        let b = QueryBuilder::from_params(&params_from(SearchRequest {
            q: Some("red shoes".into()),
            ..SearchRequest::default()
        }));
        let sql = b.page_sql();
        // One bind, referenced from both the WHERE clause and the rank
        // expression.
        assert_eq!(b.binds().len(), 1);
        assert_eq!(sql.matches("to_tsquery('simple', $1)").count(), 2);
        assert_eq!(
            b.binds()[0],
            BindValue::Text("red:* & shoes:*".to_string())
        );
    }
}
