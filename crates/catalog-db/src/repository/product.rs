//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered, paginated search (keyword, category, rating, brand)
//! - CRUD operations scoped to the owning user
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Product Search Works                             │
//! │                                                                         │
//! │  { keyword: "bean", category: "", rating: 4, brand: None }             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Skip blank / zero filters                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE p.deleted_at IS NULL                                            │
//! │    AND p.name LIKE ?1 ESCAPE '\'     ← '%bean%', case-insensitive      │
//! │    AND p.rating = ?2                                                   │
//! │  ORDER BY p.created_at, p.rowid LIMIT ?3 OFFSET ?4                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Every row carries COUNT(*) OVER() → total_data for the page meta      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use catalog_core::validation::{validate_name, validate_price, validate_rating, validate_stock};
use catalog_core::{
    CreateProductRequest, DeleteProductRequest, GetProductRequest, IdResponse, ListProductsRequest,
    Paged, Product, ProductItem, ProductsResponse, UpdateProductRequest,
};

use super::window_total;
use crate::error::{failed, DbError, DbResult};
use crate::query::{self, PRODUCT_ITEM_BY_ID};

/// A search row: the product projection plus the window count.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    total_data: i64,
    #[sqlx(flatten)]
    item: ProductItem,
}

/// `None`, `""` and whitespace all mean "no image".
fn supplied_image(image_url: Option<&str>) -> Option<&str> {
    image_url.map(str::trim).filter(|url| !url.is_empty())
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Search products
/// let page = repo.list(&ListProductsRequest {
///     keyword: Some("coffee".into()),
///     ..Default::default()
/// }).await?;
///
/// // Get by ID
/// let product = repo.get(&GetProductRequest { id: "uuid-here".into() }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product inside a shop the caller owns, under a category
    /// the caller owns.
    ///
    /// The ownership checks and the insert are one statement: the row is
    /// only inserted when both a live shop and a live category exist for
    /// `user_id`. Only a rejected insert costs a second lookup, to name the
    /// entity that was missing.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored record
    /// * `Err(DbError::Validation)` - Bad name, price, stock or rating
    /// * `Err(DbError::NotFound)` - Shop or category missing, deleted or not
    ///   the caller's
    pub async fn create(&self, req: &CreateProductRequest) -> DbResult<Product> {
        validate_name("name", &req.name)?;
        validate_price(req.price)?;
        validate_stock(req.stock)?;
        validate_rating(req.rating)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, shop_id = %req.shop_id, user_id = %req.user_id, "Creating product");

        let product: Option<Product> = sqlx::query_as(
            r#"
            INSERT INTO products (
                id, shop_id, user_id, category_id, name, description,
                price_cents, stock, rating, brand, image_url,
                created_at, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12
            WHERE EXISTS (
                SELECT 1 FROM shops
                WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL
            )
            AND EXISTS (
                SELECT 1 FROM categories
                WHERE id = ?4 AND user_id = ?3 AND deleted_at IS NULL
            )
            RETURNING
                id, shop_id, user_id, category_id, name, description,
                price_cents, stock, rating, brand, image_url,
                created_at, updated_at, deleted_at
            "#,
        )
        .bind(&id)
        .bind(&req.shop_id)
        .bind(&req.user_id)
        .bind(&req.category_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.price.cents())
        .bind(req.stock)
        .bind(req.rating)
        .bind(&req.brand)
        .bind(supplied_image(req.image_url.as_deref()))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(failed("product::create", req))?;

        match product {
            Some(product) => Ok(product),
            None => Err(self.missing_parent(req).await),
        }
    }

    /// Names the parent that made a create insert nothing.
    async fn missing_parent(&self, req: &CreateProductRequest) -> DbError {
        let shop_owned: Result<bool, sqlx::Error> = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM shops WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL)",
        )
        .bind(&req.shop_id)
        .bind(&req.user_id)
        .fetch_one(&self.pool)
        .await;

        match shop_owned {
            Ok(true) => DbError::not_found("Category", &req.category_id),
            Ok(false) => DbError::not_found("Shop", &req.shop_id),
            Err(err) => failed("product::create", req)(err),
        }
    }

    /// Gets a live product by id, with its category name.
    pub async fn get(&self, req: &GetProductRequest) -> DbResult<ProductItem> {
        debug!(id = %req.id, "Getting product");

        let item: Option<ProductItem> = sqlx::query_as(PRODUCT_ITEM_BY_ID)
            .bind(&req.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(failed("product::get", req))?;

        item.ok_or_else(|| DbError::not_found("Product", &req.id))
    }

    /// Searches live products across all shops, one page at a time.
    ///
    /// ## Filters
    /// * `keyword` - substring of the product name
    /// * `category` - substring of the category name
    /// * `rating` - exact rating
    /// * `brand` - substring of the brand
    ///
    /// String filters are case-insensitive and match `%`, `_` and `\`
    /// literally. Blank strings and a zero rating are ignored.
    pub async fn list(&self, req: &ListProductsRequest) -> DbResult<ProductsResponse> {
        let page = req.page.normalized();
        let query = query::product_listing(req, page);

        debug!(
            filters = query.predicate_count().saturating_sub(1),
            page = page.page,
            page_size = page.page_size,
            "Searching products"
        );

        let rows: Vec<ProductRow> = query
            .fetch_all(&self.pool)
            .await
            .map_err(failed("product::list", req))?;

        let total = window_total(rows.first().map(|r| r.total_data));
        let items: Vec<ProductItem> = rows.into_iter().map(|r| r.item).collect();

        debug!(count = items.len(), total, "Search returned products");
        Ok(Paged::new(items, page, total))
    }

    /// Updates name, description, price, stock and optionally the image.
    ///
    /// An absent or blank `image_url` keeps the stored one.
    ///
    /// ## Returns
    /// * `Ok(IdResponse)` - Update successful
    /// * `Err(DbError::NotFound)` - No live product with this id for this owner
    pub async fn update(&self, req: &UpdateProductRequest) -> DbResult<IdResponse> {
        validate_name("name", &req.name)?;
        validate_price(req.price)?;
        validate_stock(req.stock)?;

        debug!(id = %req.id, user_id = %req.user_id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?1,
                description = ?2,
                price_cents = ?3,
                stock = ?4,
                image_url = COALESCE(?5, image_url),
                updated_at = ?6
            WHERE id = ?7 AND user_id = ?8 AND deleted_at IS NULL
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.price.cents())
        .bind(req.stock)
        .bind(supplied_image(req.image_url.as_deref()))
        .bind(Utc::now())
        .bind(&req.id)
        .bind(&req.user_id)
        .execute(&self.pool)
        .await
        .map_err(failed("product::update", req))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &req.id));
        }

        Ok(IdResponse { id: req.id.clone() })
    }

    /// Soft-deletes a product the caller owns.
    pub async fn delete(&self, req: &DeleteProductRequest) -> DbResult<()> {
        debug!(id = %req.id, user_id = %req.user_id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = ?1, updated_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(&req.id)
        .bind(&req.user_id)
        .execute(&self.pool)
        .await
        .map_err(failed("product::delete", req))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &req.id));
        }

        Ok(())
    }

    /// Counts live products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(failed("product::count", &()))?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
