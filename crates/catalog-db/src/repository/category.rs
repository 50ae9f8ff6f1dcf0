//! # Category Repository
//!
//! Per-owner product categories. Small lists, so no pagination.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use catalog_core::validation::validate_name;
use catalog_core::{
    CategoriesResponse, Category, CreateCategoryRequest, DeleteCategoryRequest,
    GetCategoryRequest, ListCategoriesRequest, UpdateCategoryRequest,
};

use crate::error::{failed, DbError, DbResult};
use crate::query;

const CATEGORY_COLUMNS: &str = "id, user_id, name, created_at, updated_at, deleted_at";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Creates a category owned by `req.user_id` and returns the stored row.
    pub async fn create(&self, req: &CreateCategoryRequest) -> DbResult<Category> {
        validate_name("name", &req.name)?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            user_id: req.user_id.clone(),
            name: req.name.trim().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        debug!(id = %category.id, user_id = %category.user_id, "Creating category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.user_id)
        .bind(&category.name)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(failed("category::create", req))?;

        Ok(category)
    }

    /// Lists all live categories of an owner, sorted by name.
    pub async fn list(&self, req: &ListCategoriesRequest) -> DbResult<CategoriesResponse> {
        debug!(user_id = %req.user_id, "Listing categories");

        let items: Vec<Category> = query::category_listing(&req.user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(failed("category::list", req))?;

        Ok(CategoriesResponse { items })
    }

    /// Gets one live category of the caller.
    pub async fn get(&self, req: &GetCategoryRequest) -> DbResult<Category> {
        debug!(id = %req.id, user_id = %req.user_id, "Getting category");

        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL"
        );

        let category: Option<Category> = sqlx::query_as(&sql)
            .bind(&req.id)
            .bind(&req.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(failed("category::get", req))?;

        category.ok_or_else(|| DbError::not_found("Category", &req.id))
    }

    /// Renames a category the caller owns and returns the updated row.
    pub async fn update(&self, req: &UpdateCategoryRequest) -> DbResult<Category> {
        validate_name("name", &req.name)?;

        debug!(id = %req.id, user_id = %req.user_id, "Renaming category");

        let sql = format!(
            "UPDATE categories SET name = ?1, updated_at = ?2 \
             WHERE id = ?3 AND user_id = ?4 AND deleted_at IS NULL \
             RETURNING {CATEGORY_COLUMNS}"
        );

        let category: Option<Category> = sqlx::query_as(&sql)
            .bind(req.name.trim())
            .bind(Utc::now())
            .bind(&req.id)
            .bind(&req.user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(failed("category::update", req))?;

        category.ok_or_else(|| DbError::not_found("Category", &req.id))
    }

    /// Soft-deletes a category the caller owns.
    ///
    /// Products keep pointing at it and keep showing its name.
    pub async fn delete(&self, req: &DeleteCategoryRequest) -> DbResult<()> {
        debug!(id = %req.id, user_id = %req.user_id, "Soft-deleting category");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET deleted_at = ?1, updated_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(&req.id)
        .bind(&req.user_id)
        .execute(&self.pool)
        .await
        .map_err(failed("category::delete", req))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &req.id));
        }

        Ok(())
    }

    /// Counts live categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(failed("category::count", &()))?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{self, OTHER_OWNER, OWNER};
    use catalog_core::{FailureClass, GetProductRequest, OwnedId};

    fn list_request(user_id: &str) -> ListCategoriesRequest {
        ListCategoriesRequest {
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_row() {
        let db = testing::setup().await;

        let category = db
            .categories()
            .create(&CreateCategoryRequest {
                user_id: OWNER.to_string(),
                name: "  Coffee ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(category.name, "Coffee");
        assert_eq!(category.user_id, OWNER);

        let stored = db
            .categories()
            .get(&OwnedId::new(&category.id, OWNER))
            .await
            .unwrap();
        assert_eq!(stored.id, category.id);
        assert_eq!(stored.name, "Coffee");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = testing::setup().await;

        let err = db
            .categories()
            .create(&CreateCategoryRequest {
                user_id: OWNER.to_string(),
                name: String::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.class(), FailureClass::Validation);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_owner_scoped() {
        let db = testing::setup().await;
        testing::category(&db, OWNER, "Tea").await;
        testing::category(&db, OWNER, "Coffee").await;
        testing::category(&db, OTHER_OWNER, "Juice").await;
        let gone = testing::category(&db, OWNER, "Cocoa").await;
        db.categories().delete(&OwnedId::new(&gone, OWNER)).await.unwrap();

        let response = db.categories().list(&list_request(OWNER)).await.unwrap();

        let names: Vec<&str> = response.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Tea"]);
    }

    #[tokio::test]
    async fn test_list_returns_everything() {
        let db = testing::setup().await;
        for i in 0..15 {
            testing::category(&db, OWNER, &format!("Category {i:02}")).await;
        }

        let response = db.categories().list(&list_request(OWNER)).await.unwrap();
        assert_eq!(response.items.len(), 15);
    }

    #[tokio::test]
    async fn test_get_by_other_owner_is_not_found() {
        let db = testing::setup().await;
        let id = testing::category(&db, OWNER, "Coffee").await;

        let err = db
            .categories()
            .get(&OwnedId::new(&id, OTHER_OWNER))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_renames() {
        let db = testing::setup().await;
        let id = testing::category(&db, OWNER, "Cofee").await;

        let renamed = db
            .categories()
            .update(&UpdateCategoryRequest {
                id: id.clone(),
                user_id: OWNER.to_string(),
                name: "Coffee".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(renamed.id, id);
        assert_eq!(renamed.name, "Coffee");
        assert!(renamed.updated_at >= renamed.created_at);

        let err = db
            .categories()
            .update(&UpdateCategoryRequest {
                id: id.clone(),
                user_id: OTHER_OWNER.to_string(),
                name: "Mine now".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let stored = db.categories().get(&OwnedId::new(&id, OWNER)).await.unwrap();
        assert_eq!(stored.name, "Coffee");
    }

    #[tokio::test]
    async fn test_delete_keeps_product_category_name() {
        let db = testing::setup().await;
        let shop_id = testing::shop(&db, OWNER, "Roastery").await;
        let category_id = testing::category(&db, OWNER, "Coffee").await;
        let product = testing::product(&db, OWNER, &shop_id, &category_id, "Beans").await;

        let err = db
            .categories()
            .delete(&OwnedId::new(&category_id, OTHER_OWNER))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        db.categories()
            .delete(&OwnedId::new(&category_id, OWNER))
            .await
            .unwrap();
        assert_eq!(db.categories().count().await.unwrap(), 0);

        let item = db
            .products()
            .get(&GetProductRequest { id: product.id })
            .await
            .unwrap();
        assert_eq!(item.category, "Coffee");

        let again = db
            .categories()
            .delete(&OwnedId::new(&category_id, OWNER))
            .await
            .unwrap_err();
        assert!(again.is_not_found());
    }

    #[tokio::test]
    async fn test_count_failure_is_logged() {
        testing::assert_count_failure_logged(
            |db| async move { db.categories().count().await },
            "category::count",
        )
        .await;
    }
}
