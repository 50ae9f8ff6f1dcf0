//! # Repository Module
//!
//! One repository per entity, one method per use case.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What Every Repository Guarantees                     │
//! │                                                                         │
//! │  Request layer                                                         │
//! │       │                                                                 │
//! │       │  db.shops().list(&ListShopsRequest { user_id, page })          │
//! │       ▼                                                                 │
//! │  ShopRepository / ProductRepository / CategoryRepository               │
//! │  ├── reads skip rows with deleted_at set                               │
//! │  ├── update/delete match (id, user_id); mismatch → NotFound            │
//! │  ├── delete only sets deleted_at                                       │
//! │  └── lists: FilterQuery → batch loader → PageMeta                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ShopRepository`](shop::ShopRepository) - Shops with their products
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and search
//! - [`CategoryRepository`](category::CategoryRepository) - Per-owner categories

pub mod category;
pub mod product;
pub mod shop;

/// Converts a window count column to the unsigned total.
pub(crate) fn window_total(total_data: Option<i64>) -> u64 {
    total_data.and_then(|t| u64::try_from(t).ok()).unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the repository tests.

    use catalog_core::{
        CreateCategoryRequest, CreateProductRequest, CreateShopRequest, Money, Product,
    };

    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::subscriber::DefaultGuard;

    use crate::{Database, DbConfig};

    pub const OWNER: &str = "owner-1";
    pub const OTHER_OWNER: &str = "owner-2";

    pub async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Log lines written while the returned guard is alive, on this thread.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    /// Asserts `count` fails on a closed pool and logs its operation name.
    pub async fn assert_count_failure_logged<F, Fut>(count: F, op: &str)
    where
        F: FnOnce(Database) -> Fut,
        Fut: std::future::Future<Output = crate::DbResult<i64>>,
    {
        let db = setup().await;
        db.close().await;

        let (logs, _guard) = capture_logs();
        let err = count(db).await.unwrap_err();

        assert_eq!(err.class(), catalog_core::FailureClass::Infrastructure);
        let logs = logs.contents();
        assert!(logs.contains("Store call failed"), "logs: {logs}");
        assert!(logs.contains(op), "logs: {logs}");
    }

    pub async fn shop(db: &Database, owner: &str, name: &str) -> String {
        db.shops()
            .create(&CreateShopRequest {
                user_id: owner.to_string(),
                name: name.to_string(),
                description: format!("{name} description"),
                terms: "No refunds".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    pub async fn category(db: &Database, owner: &str, name: &str) -> String {
        db.categories()
            .create(&CreateCategoryRequest {
                user_id: owner.to_string(),
                name: name.to_string(),
            })
            .await
            .unwrap()
            .id
    }

    pub fn product_request(
        owner: &str,
        shop_id: &str,
        category_id: &str,
        name: &str,
    ) -> CreateProductRequest {
        CreateProductRequest {
            user_id: owner.to_string(),
            shop_id: shop_id.to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Money::from_cents(1000),
            stock: 10,
            rating: 4,
            brand: "Acme".to_string(),
            image_url: None,
        }
    }

    pub async fn product(
        db: &Database,
        owner: &str,
        shop_id: &str,
        category_id: &str,
        name: &str,
    ) -> Product {
        db.products()
            .create(&product_request(owner, shop_id, category_id, name))
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_total() {
        assert_eq!(window_total(None), 0);
        assert_eq!(window_total(Some(25)), 25);
        assert_eq!(window_total(Some(-1)), 0);
    }
}
