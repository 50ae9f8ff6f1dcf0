//! # Shop Repository
//!
//! Shops and the products shown inside them.
//!
//! ## Listing a Page of Shops
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(user_id, page 2, size 10)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. shop_listing: one row per shop + COUNT(*) OVER() as total_data     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. batch loader: products WHERE shop_id IN (ids of this page)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. attach: every shop gets its products (or an empty list)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Paged { items, meta: { page, page_size, total_data, total_page } }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two statements per page no matter how many shops it holds.

use std::slice;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use catalog_core::validation::{validate_description, validate_name};
use catalog_core::{
    CreateShopRequest, DeleteShopRequest, GetShopRequest, IdResponse, ListShopsRequest, Paged,
    Shop, ShopDetail, ShopItem, ShopsResponse, UpdateShopRequest,
};

use super::window_total;
use crate::batch::{load_products_by_shop, take_children};
use crate::error::{failed, DbError, DbResult};
use crate::query;

/// A listing row: the shop projection plus the window count.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    total_data: i64,
    id: String,
    name: String,
}

/// Repository for shop database operations.
///
/// ## Usage
/// ```rust,ignore
/// let shops = db.shops();
///
/// let created = shops.create(&CreateShopRequest { .. }).await?;
/// let detail = shops.get(&GetShopRequest { id: created.id }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Creates a shop owned by `req.user_id`.
    ///
    /// ## Returns
    /// * `Ok(IdResponse)` - Id of the new shop
    /// * `Err(DbError::Validation)` - Blank or oversized name/description
    pub async fn create(&self, req: &CreateShopRequest) -> DbResult<IdResponse> {
        validate_name("name", &req.name)?;
        validate_description("description", &req.description)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, user_id = %req.user_id, "Creating shop");

        sqlx::query(
            r#"
            INSERT INTO shops (id, user_id, name, description, terms, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(&req.user_id)
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(&req.terms)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(failed("shop::create", req))?;

        Ok(IdResponse { id })
    }

    /// Gets a live shop by id together with its live products.
    ///
    /// Anyone may read a shop; no owner check.
    pub async fn get(&self, req: &GetShopRequest) -> DbResult<ShopDetail> {
        debug!(id = %req.id, "Getting shop");

        let shop: Option<Shop> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, description, terms, created_at, updated_at, deleted_at
            FROM shops
            WHERE id = ?1 AND deleted_at IS NULL
            "#,
        )
        .bind(&req.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(failed("shop::get", req))?;

        let shop = shop.ok_or_else(|| DbError::not_found("Shop", &req.id))?;

        let mut groups = load_products_by_shop(&self.pool, slice::from_ref(&shop.id))
            .await
            .map_err(failed("shop::get", req))?;
        let products = take_children(&mut groups, &shop.id);

        Ok(ShopDetail { shop, products })
    }

    /// Lists one page of the caller's shops, each with its products.
    ///
    /// A page index or size below 1 falls back to the defaults. A page past
    /// the end comes back empty with `total_data = 0`.
    pub async fn list(&self, req: &ListShopsRequest) -> DbResult<ShopsResponse> {
        let page = req.page.normalized();

        debug!(user_id = %req.user_id, page = page.page, page_size = page.page_size, "Listing shops");

        let rows: Vec<ShopRow> = query::shop_listing(&req.user_id, page)
            .fetch_all(&self.pool)
            .await
            .map_err(failed("shop::list", req))?;

        let total = window_total(rows.first().map(|r| r.total_data));
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

        let mut groups = load_products_by_shop(&self.pool, &ids)
            .await
            .map_err(failed("shop::list", req))?;

        let items = rows
            .into_iter()
            .map(|row| {
                let products = take_children(&mut groups, &row.id);
                ShopItem {
                    id: row.id,
                    name: row.name,
                    products,
                }
            })
            .collect();

        Ok(Paged::new(items, page, total))
    }

    /// Overwrites name, description and terms of a shop the caller owns.
    ///
    /// ## Returns
    /// * `Ok(IdResponse)` - Shop updated
    /// * `Err(DbError::NotFound)` - No live shop with this id for this owner
    pub async fn update(&self, req: &UpdateShopRequest) -> DbResult<IdResponse> {
        validate_name("name", &req.name)?;
        validate_description("description", &req.description)?;

        debug!(id = %req.id, user_id = %req.user_id, "Updating shop");

        let updated: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE shops SET
                name = ?1,
                description = ?2,
                terms = ?3,
                updated_at = ?4
            WHERE id = ?5 AND user_id = ?6 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(&req.terms)
        .bind(Utc::now())
        .bind(&req.id)
        .bind(&req.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(failed("shop::update", req))?;

        updated
            .map(|id| IdResponse { id })
            .ok_or_else(|| DbError::not_found("Shop", &req.id))
    }

    /// Soft-deletes a shop the caller owns.
    ///
    /// Its products stay untouched; they simply stop showing up under it.
    pub async fn delete(&self, req: &DeleteShopRequest) -> DbResult<()> {
        debug!(id = %req.id, user_id = %req.user_id, "Soft-deleting shop");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE shops
            SET deleted_at = ?1, updated_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(&req.id)
        .bind(&req.user_id)
        .execute(&self.pool)
        .await
        .map_err(failed("shop::delete", req))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", &req.id));
        }

        Ok(())
    }

    /// Counts live shops (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shops WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(failed("shop::count", &()))?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
