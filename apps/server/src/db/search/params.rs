//! Search parameter parsing and normalization.
//!
//! Raw request parameters arrive loosely typed from the query string; the
//! normalizer is total over all inputs — invalid values degrade to safe
//! defaults instead of failing, so there is no error path here.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw search parameters, exactly as received from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub q: Option<String>,
    /// Repeated `category` query parameter, still unparsed.
    pub categories: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub in_stock: Option<String>,
    pub sort: Option<String>,
    pub method: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Relevance,
    Price,
    CreatedAt,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated, defaulted search parameters. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: String,
    pub category_ids: Vec<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub sort: SortKey,
    pub method: SortDirection,
    pub page: i64,
    pub page_size: i64,
}

impl SearchParams {
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl SearchRequest {
    /// Normalize into [`SearchParams`]. Total: every input produces a value.
    pub fn normalize(&self) -> SearchParams {
        let q = self
            .q
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        // Positive ids only; unparseable or non-positive entries are dropped,
        // duplicates collapse. Empty set means "no category filter".
        let mut category_ids: Vec<i64> = self
            .categories
            .iter()
            .filter_map(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let page = match parse_i64(self.page.as_deref()) {
            Some(n) if n >= 1 => n,
            _ => 1,
        };
        let page_size = match parse_i64(self.page_size.as_deref()) {
            Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
            Some(n) if n > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
            _ => DEFAULT_PAGE_SIZE,
        };

        let min_price = parse_price(self.min_price.as_deref());
        let max_price = parse_price(self.max_price.as_deref());
        let in_stock = parse_bool(self.in_stock.as_deref());

        let sort_raw = self
            .sort
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let sort = match sort_raw.as_str() {
            "relevance" => SortKey::Relevance,
            "price" => SortKey::Price,
            "created_at" => SortKey::CreatedAt,
            "rating" => SortKey::Rating,
            "" if !q.is_empty() => SortKey::Relevance,
            _ => SortKey::CreatedAt,
        };
        // Relevance is only meaningful with a text query.
        let sort = if sort == SortKey::Relevance && q.is_empty() {
            SortKey::CreatedAt
        } else {
            sort
        };

        let method_raw = self
            .method
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let method = match method_raw.as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            "" if sort == SortKey::Price => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        SearchParams {
            q,
            category_ids,
            min_price,
            max_price,
            in_stock,
            sort,
            method,
            page,
            page_size,
        }
    }
}

fn parse_i64(value: Option<&str>) -> Option<i64> {
    value?.trim().parse::<i64>().ok()
}

/// Price bounds are rounded to the nearest cent; negative or non-finite
/// bounds are treated as absent.
fn parse_price(value: Option<&str>) -> Option<f64> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    let f = v.parse::<f64>().ok()?;
    if !f.is_finite() || f < 0.0 {
        return None;
    }
    Some((f * 100.0).round() / 100.0)
}

fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> SearchRequest {
        SearchRequest::default()
    }

    #[test]
    fn empty_request_gets_defaults() {
        let p = req().normalize();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(p.sort, SortKey::CreatedAt);
        assert_eq!(p.method, SortDirection::Desc);
        assert!(p.q.is_empty());
        assert!(p.category_ids.is_empty());
        assert_eq!(p.min_price, None);
        assert_eq!(p.max_price, None);
        assert_eq!(p.in_stock, None);
    }

    #[test]
    fn page_and_size_are_clamped() {
        let p = SearchRequest {
            page: Some("-3".into()),
            page_size: Some("1000".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = SearchRequest {
            page: Some("0".into()),
            page_size: Some("0".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);

        let p = SearchRequest {
            page: Some("junk".into()),
            page_size: Some("junk".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn category_ids_drop_invalid_and_dedup() {
        let p = SearchRequest {
            categories: vec![
                "2".into(),
                "0".into(),
                "-3".into(),
                "abc".into(),
                "2".into(),
                "7".into(),
            ],
            ..req()
        }
        .normalize();
        assert_eq!(p.category_ids, vec![2, 7]);
    }

    #[test]
    fn prices_round_to_cents_and_discard_negatives() {
        let p = SearchRequest {
            min_price: Some("19.999".into()),
            max_price: Some("-5".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.min_price, Some(20.00));
        assert_eq!(p.max_price, None);

        let p = SearchRequest {
            min_price: Some("10.004".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.min_price, Some(10.0));

        let p = SearchRequest {
            min_price: Some("NaN".into()),
            max_price: Some("inf".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.min_price, None);
        assert_eq!(p.max_price, None);
    }

    #[test]
    fn default_sort_depends_on_query() {
        let p = SearchRequest {
            q: Some("shoes".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.sort, SortKey::Relevance);

        let p = req().normalize();
        assert_eq!(p.sort, SortKey::CreatedAt);
    }

    #[test]
    fn relevance_without_query_resets_to_created_at() {
        let p = SearchRequest {
            sort: Some("relevance".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.sort, SortKey::CreatedAt);

        // Whitespace-only q is empty after trimming.
        let p = SearchRequest {
            q: Some("   ".into()),
            sort: Some("relevance".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.sort, SortKey::CreatedAt);
    }

    #[test]
    fn unknown_sort_resets_to_created_at() {
        let p = SearchRequest {
            sort: Some("popularity".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.sort, SortKey::CreatedAt);
    }

    #[test]
    fn method_defaults_per_sort() {
        let p = SearchRequest {
            sort: Some("price".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.method, SortDirection::Asc);

        let p = SearchRequest {
            sort: Some("rating".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.method, SortDirection::Desc);
    }

    #[test]
    fn bogus_method_resets_to_desc() {
        let p = SearchRequest {
            sort: Some("rating".into()),
            method: Some("bogus".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.method, SortDirection::Desc);

        // Even for price, which defaults to asc only when method is absent.
        let p = SearchRequest {
            sort: Some("price".into()),
            method: Some("sideways".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.method, SortDirection::Desc);
    }

    #[test]
    fn query_is_trimmed_and_lowercased() {
        let p = SearchRequest {
            q: Some("  Red SHOES  ".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.q, "red shoes");
    }

    #[test]
    fn in_stock_accepts_go_style_bools() {
        for (raw, expect) in [
            ("true", Some(true)),
            ("TRUE", Some(true)),
            ("1", Some(true)),
            ("t", Some(true)),
            ("false", Some(false)),
            ("0", Some(false)),
            ("f", Some(false)),
            ("yes", None),
            ("", None),
        ] {
            let p = SearchRequest {
                in_stock: Some(raw.into()),
                ..req()
            }
            .normalize();
            assert_eq!(p.in_stock, expect, "raw = {raw:?}");
        }
    }

    #[test]
    fn pagination_offsets() {
        let p = SearchRequest {
            page: Some("3".into()),
            page_size: Some("10".into()),
            ..req()
        }
        .normalize();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn normalized_output_always_satisfies_invariants() {
        // Normalization is total: arbitrary garbage still yields a value
        // within bounds.
        let garbage = SearchRequest {
            q: Some("\u{1F600} Ünïcode!!".into()),
            categories: vec!["".into(), "9999999999999999999999".into()],
            min_price: Some("--".into()),
            max_price: Some("1e999".into()),
            in_stock: Some("maybe".into()),
            sort: Some("SELECT *".into()),
            method: Some("up".into()),
            page: Some("³".into()),
            page_size: Some("-1".into()),
        };
        let p = garbage.normalize();
        assert!(p.page >= 1);
        assert!((1..=MAX_PAGE_SIZE).contains(&p.page_size));
        assert_eq!(p.method, SortDirection::Desc);
        assert!(matches!(
            p.sort,
            SortKey::Relevance | SortKey::Price | SortKey::CreatedAt | SortKey::Rating
        ));
    }
}
