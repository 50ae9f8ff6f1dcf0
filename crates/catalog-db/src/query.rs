//! # Query Builder
//!
//! Builds listing queries whose WHERE clause grows only for the filters a
//! request actually carries.
//!
//! ## How a Filtered Query Is Assembled
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ListProductsRequest { keyword: "bean", rating: 4, page: (2, 10) }     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base:     p.deleted_at IS NULL                                        │
//! │  keyword:  p.name LIKE ?  ──────────► param "%bean%"                   │
//! │  category: (none) skipped                                              │
//! │  rating:   p.rating = ?   ──────────► param 4                          │
//! │  brand:    (none) skipped                                              │
//! │  page:     LIMIT ? OFFSET ? ────────► params 10, 10                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  render(): placeholders numbered at the end, in push order             │
//! │                                                                         │
//! │  WHERE p.deleted_at IS NULL                                            │
//! │    AND p.name LIKE ?1 ESCAPE '\'                                       │
//! │    AND p.rating = ?2                                                   │
//! │  LIMIT ?3 OFFSET ?4                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values only ever travel as bound parameters. The only text that reaches
//! the SQL string is the `&'static str` column expressions written in this
//! crate.

use catalog_core::{ListProductsRequest, PageRequest};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

// =============================================================================
// Parameters and Conditions
// =============================================================================

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    IsNull,
    Eq,
    /// Case-insensitive substring (ASCII), with `\` as the escape character.
    Contains,
    In,
}

#[derive(Debug, Clone)]
struct Condition {
    column: &'static str,
    op: Op,
    params: Vec<Param>,
}

// =============================================================================
// FilterQuery
// =============================================================================

/// Accumulates `(predicate, parameter)` pairs and renders them with
/// positional placeholders.
///
/// ## Example
/// ```rust
/// use catalog_db::query::{FilterQuery, Param};
///
/// let query = FilterQuery::new("SELECT id FROM shops")
///     .is_null("deleted_at")
///     .eq("user_id", Param::Text("owner-1".into()))
///     .contains_if("name", Some("  "));
///
/// assert_eq!(query.predicate_count(), 2);
/// assert_eq!(
///     query.sql(),
///     "SELECT id FROM shops WHERE deleted_at IS NULL AND user_id = ?1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FilterQuery {
    select: &'static str,
    conditions: Vec<Condition>,
    order_by: Option<&'static str>,
    page: Option<PageRequest>,
}

impl FilterQuery {
    /// Starts from a `SELECT ... FROM ...` head with no WHERE clause.
    pub fn new(select: &'static str) -> Self {
        FilterQuery {
            select,
            conditions: Vec::new(),
            order_by: None,
            page: None,
        }
    }

    /// `column IS NULL`. Used for the soft-delete predicate.
    pub fn is_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition {
            column,
            op: Op::IsNull,
            params: Vec::new(),
        });
        self
    }

    /// `column = ?`
    pub fn eq(mut self, column: &'static str, value: Param) -> Self {
        self.conditions.push(Condition {
            column,
            op: Op::Eq,
            params: vec![value],
        });
        self
    }

    /// `column = ?` when `value` is present and non-zero.
    pub fn eq_if(self, column: &'static str, value: Option<i64>) -> Self {
        match value {
            Some(v) if v != 0 => self.eq(column, Param::Int(v)),
            _ => self,
        }
    }

    /// `column LIKE '%value%'` when `value` is non-blank after trimming.
    pub fn contains_if(mut self, column: &'static str, value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return self;
        };

        self.conditions.push(Condition {
            column,
            op: Op::Contains,
            params: vec![Param::Text(like_pattern(value))],
        });
        self
    }

    /// `column IN (?, ?, ...)`. An empty list matches nothing.
    pub fn in_list<I, S>(mut self, column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition {
            column,
            op: Op::In,
            params: values.into_iter().map(|v| Param::Text(v.into())).collect(),
        });
        self
    }

    pub fn order_by(mut self, order: &'static str) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Appends `LIMIT ? OFFSET ?` for this page.
    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    /// Number of WHERE predicates, base predicates included.
    pub fn predicate_count(&self) -> usize {
        self.conditions.len()
    }

    /// Renders the SQL text. Placeholders are numbered in the same order as
    /// [`params`](Self::params) returns the values.
    pub fn sql(&self) -> String {
        let mut sql = String::from(self.select);
        let mut next = 1usize;
        let mut placeholder = || {
            let p = format!("?{next}");
            next += 1;
            p
        };

        for (i, cond) in self.conditions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(cond.column);

            match cond.op {
                Op::IsNull => sql.push_str(" IS NULL"),
                Op::Eq => {
                    sql.push_str(" = ");
                    sql.push_str(&placeholder());
                }
                Op::Contains => {
                    sql.push_str(" LIKE ");
                    sql.push_str(&placeholder());
                    sql.push_str(" ESCAPE '\\'");
                }
                Op::In if cond.params.is_empty() => sql.push_str(" IN (NULL)"),
                Op::In => {
                    let list: Vec<String> = cond.params.iter().map(|_| placeholder()).collect();
                    sql.push_str(" IN (");
                    sql.push_str(&list.join(", "));
                    sql.push(')');
                }
            }
        }

        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if self.page.is_some() {
            sql.push_str(" LIMIT ");
            sql.push_str(&placeholder());
            sql.push_str(" OFFSET ");
            sql.push_str(&placeholder());
        }

        sql
    }

    /// Bound values in placeholder order: filters first, then limit, offset.
    pub fn params(&self) -> Vec<Param> {
        let mut params: Vec<Param> = self
            .conditions
            .iter()
            .flat_map(|c| c.params.iter().cloned())
            .collect();

        if let Some(page) = self.page {
            params.push(Param::Int(i64::from(page.limit())));
            // An offset past i64::MAX is past any table; saturate, never wrap.
            params.push(Param::Int(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
        }

        params
    }

    /// Runs the query and maps every row with `FromRow`.
    pub async fn fetch_all<O>(&self, pool: &SqlitePool) -> Result<Vec<O>, sqlx::Error>
    where
        O: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = self.sql();
        let mut query = sqlx::query_as::<_, O>(&sql);

        for param in self.params() {
            query = match param {
                Param::Text(s) => query.bind(s),
                Param::Int(i) => query.bind(i),
            };
        }

        query.fetch_all(pool).await
    }
}

/// Wraps `value` in `%...%`, escaping LIKE wildcards so they match literally.
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Listing Queries
// =============================================================================

/// Columns of [`ProductItem`](catalog_core::ProductItem), category resolved
/// to its name.
macro_rules! product_item_columns {
    () => {
        "p.id, p.shop_id, p.user_id, c.name AS category, \
         p.name, p.description, p.price_cents, p.stock, p.rating, p.brand, p.image_url"
    };
}

macro_rules! from_products_join_categories {
    () => {
        " FROM products p JOIN categories c ON c.id = p.category_id"
    };
}

/// Product search: live products, each optional filter adds one predicate.
pub fn product_listing(req: &ListProductsRequest, page: PageRequest) -> FilterQuery {
    FilterQuery::new(concat!(
        "SELECT COUNT(*) OVER() AS total_data, ",
        product_item_columns!(),
        from_products_join_categories!()
    ))
    .is_null("p.deleted_at")
    .contains_if("p.name", req.keyword.as_deref())
    .contains_if("c.name", req.category.as_deref())
    .eq_if("p.rating", req.rating.map(i64::from))
    .contains_if("p.brand", req.brand.as_deref())
    .order_by("p.created_at, p.rowid")
    .paginate(page)
}

/// One page of an owner's live shops.
pub fn shop_listing(user_id: &str, page: PageRequest) -> FilterQuery {
    FilterQuery::new("SELECT COUNT(*) OVER() AS total_data, s.id, s.name FROM shops s")
        .is_null("s.deleted_at")
        .eq("s.user_id", Param::Text(user_id.to_string()))
        .order_by("s.created_at, s.rowid")
        .paginate(page)
}

/// Live products of the given shops, in insertion order.
pub fn products_of_shops<I, S>(shop_ids: I) -> FilterQuery
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FilterQuery::new(concat!(
        "SELECT ",
        product_item_columns!(),
        from_products_join_categories!()
    ))
    .in_list("p.shop_id", shop_ids)
    .is_null("p.deleted_at")
    .order_by("p.created_at, p.rowid")
}

/// All live categories of one owner. Not paginated.
pub fn category_listing(user_id: &str) -> FilterQuery {
    FilterQuery::new(
        "SELECT id, user_id, name, created_at, updated_at, deleted_at FROM categories",
    )
    .is_null("deleted_at")
    .eq("user_id", Param::Text(user_id.to_string()))
    .order_by("name, rowid")
}

/// Single live product by id, same projection as the listings.
pub(crate) const PRODUCT_ITEM_BY_ID: &str = concat!(
    "SELECT ",
    product_item_columns!(),
    from_products_join_categories!(),
    " WHERE p.id = ?1 AND p.deleted_at IS NULL"
);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        keyword: Option<&str>,
        category: Option<&str>,
        rating: Option<i32>,
        brand: Option<&str>,
    ) -> ListProductsRequest {
        ListProductsRequest {
            keyword: keyword.map(String::from),
            category: category.map(String::from),
            rating,
            brand: brand.map(String::from),
            page: PageRequest::default(),
        }
    }

    #[test]
    fn test_predicate_count_tracks_supplied_filters() {
        // Every combination of the four filters: one bit per filter.
        for mask in 0u8..16 {
            let req = request(
                (mask & 1 != 0).then_some("bean"),
                (mask & 2 != 0).then_some("coffee"),
                (mask & 4 != 0).then_some(4),
                (mask & 8 != 0).then_some("acme"),
            );
            let query = product_listing(&req, req.page);

            let supplied = mask.count_ones() as usize;
            assert_eq!(query.predicate_count(), 1 + supplied, "mask {mask:04b}");
            // filter params + limit + offset
            assert_eq!(query.params().len(), supplied + 2, "mask {mask:04b}");
        }
    }

    #[test]
    fn test_blank_and_zero_filters_are_skipped() {
        let req = request(Some("   "), Some(""), Some(0), None);
        let query = product_listing(&req, req.page);

        assert_eq!(query.predicate_count(), 1);
        assert_eq!(query.params(), vec![Param::Int(10), Param::Int(0)]);
    }

    #[test]
    fn test_params_follow_declaration_order() {
        let req = request(Some("bean"), Some("coffee"), Some(4), Some("acme"));
        let query = product_listing(&req, PageRequest::new(3, 10));

        assert_eq!(
            query.params(),
            vec![
                Param::Text("%bean%".to_string()),
                Param::Text("%coffee%".to_string()),
                Param::Int(4),
                Param::Text("%acme%".to_string()),
                Param::Int(10),
                Param::Int(20),
            ]
        );

        let sql = query.sql();
        let name = sql.find("p.name LIKE ?1").unwrap();
        let category = sql.find("c.name LIKE ?2").unwrap();
        let rating = sql.find("p.rating = ?3").unwrap();
        let brand = sql.find("p.brand LIKE ?4").unwrap();
        assert!(name < category && category < rating && rating < brand);
        assert!(sql.ends_with("ORDER BY p.created_at, p.rowid LIMIT ?5 OFFSET ?6"));
    }

    #[test]
    fn test_values_never_reach_sql_text() {
        let req = request(Some("'; DROP TABLE products; --"), None, None, None);
        let query = product_listing(&req, req.page);

        assert!(!query.sql().contains("DROP TABLE"));
        assert!(query.sql().contains("p.name LIKE ?1 ESCAPE '\\'"));
    }

    #[test]
    fn test_first_page_offsets() {
        let query = shop_listing("owner-1", PageRequest::new(1, 10));

        assert_eq!(query.predicate_count(), 2);
        assert_eq!(
            query.params(),
            vec![
                Param::Text("owner-1".to_string()),
                Param::Int(10),
                Param::Int(0)
            ]
        );
        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) OVER() AS total_data, s.id, s.name FROM shops s \
             WHERE s.deleted_at IS NULL AND s.user_id = ?1 \
             ORDER BY s.created_at, s.rowid LIMIT ?2 OFFSET ?3"
        );
    }

    #[test]
    fn test_huge_offset_saturates() {
        let query = shop_listing("owner-1", PageRequest::new(u32::MAX, u32::MAX));

        assert_eq!(
            query.params()[1..],
            [Param::Int(i64::from(u32::MAX)), Param::Int(i64::MAX)]
        );
    }

    #[test]
    fn test_in_list_placeholders() {
        let query = products_of_shops(["a", "b", "c"]);

        assert!(query
            .sql()
            .contains("WHERE p.shop_id IN (?1, ?2, ?3) AND p.deleted_at IS NULL"));
        assert_eq!(query.params().len(), 3);
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        let query = products_of_shops(Vec::<String>::new());

        assert!(query.sql().contains("p.shop_id IN (NULL)"));
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_category_listing_has_no_limit() {
        let query = category_listing("owner-1");

        assert_eq!(query.predicate_count(), 2);
        assert!(!query.sql().contains("LIMIT"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bean"), "%bean%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
