//! # Batch Loader
//!
//! Loads the products of a whole page of shops with one query.
//!
//! ## N+1 vs Batched
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ❌ N+1: one query per shop                                            │
//! │     SELECT ... FROM shops LIMIT 10                  (1)                │
//! │     SELECT ... FROM products WHERE shop_id = ?      (×10)              │
//! │                                                                         │
//! │  ✅ Batched: one query per page of shops                               │
//! │     SELECT ... FROM shops LIMIT 10                  (1)                │
//! │     SELECT ... FROM products WHERE shop_id IN (?1..?10)  (1)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  group in memory:  shop-a → [p1, p4]   shop-b → [p2]   shop-c → ∅      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shops without live products get no map entry; callers use
//! [`take_children`] so they always end up with an empty list instead.
//!
//! The child rows come from a [`ProductSource`]. The repositories pass the
//! pool itself; tests wrap it to count fetches.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use catalog_core::ProductItem;
use sqlx::SqlitePool;
use tracing::debug;

use crate::query;

/// Where the batch loader gets its child rows from.
pub trait ProductSource {
    /// Every live product of `shop_ids`, fetched in one round trip.
    fn products_of_shops(
        &self,
        shop_ids: &[String],
    ) -> impl Future<Output = Result<Vec<ProductItem>, sqlx::Error>> + Send;
}

impl ProductSource for SqlitePool {
    fn products_of_shops(
        &self,
        shop_ids: &[String],
    ) -> impl Future<Output = Result<Vec<ProductItem>, sqlx::Error>> + Send {
        let query = query::products_of_shops(shop_ids.iter().cloned());
        async move { query.fetch_all(self).await }
    }
}

/// Fetches every live product of `shop_ids` in a single `IN (...)` query and
/// groups them by shop.
///
/// An empty `shop_ids` returns an empty map without touching the database.
/// Any query error is returned as-is; there is no partial map.
pub async fn load_products_by_shop<S>(
    source: &S,
    shop_ids: &[String],
) -> Result<HashMap<String, Vec<ProductItem>>, sqlx::Error>
where
    S: ProductSource + ?Sized,
{
    if shop_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let products = source.products_of_shops(shop_ids).await?;

    debug!(
        shops = shop_ids.len(),
        products = products.len(),
        "Batch loaded products"
    );

    Ok(group_by_key(products, |p| p.shop_id.clone()))
}

/// Groups rows by `key`, keeping the input order inside each group.
pub fn group_by_key<K, T, F>(rows: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Removes and returns the children of `id`, or an empty list.
pub fn take_children<T>(groups: &mut HashMap<String, Vec<T>>, id: &str) -> Vec<T> {
    groups.remove(id).unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================
