//! # Domain Types
//!
//! Entity records and the request/response shapes of every catalog use case.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Shop       │   │    Product      │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  shop_id (FK)   │──►│  id (UUID)      │       │
//! │  │  user_id(owner) │   │  category_id    │   │  user_id(owner) │       │
//! │  │  name, terms    │   │  price_cents    │   │  name           │       │
//! │  │  deleted_at     │   │  stock, rating  │   │  deleted_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  List projections:  ShopItem { id, name, products: [ProductItem] }     │
//! │                     ProductItem { ..., category: <category name> }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every mutating request carries the caller's `user_id`. Repositories match
//! on `(id, user_id)`; a row owned by someone else is reported exactly like
//! a missing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pagination::{PageRequest, Paged};

// =============================================================================
// Shop
// =============================================================================

/// A shop owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shop {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owner.
    pub user_id: String,

    pub name: String,
    pub description: String,

    /// Terms and conditions shown to buyers.
    pub terms: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker. Always `None` on rows a repository returns.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Shop list entry with its products attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    /// Empty when the shop has no live products, never absent.
    pub products: Vec<ProductItem>,
}

/// A single shop with its live products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub shop: Shop,
    pub products: Vec<ProductItem>,
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub shop_id: String,
    pub user_id: String,
    pub category_id: String,
    pub name: String,
    pub description: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on hand, never negative.
    pub stock: i32,

    /// 1..=5
    pub rating: i32,

    pub brand: String,
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Product as it appears in listings: the category is resolved to its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductItem {
    pub id: String,
    pub shop_id: String,
    pub user_id: String,
    /// Category name (joined), not the id.
    pub category: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i32,
    pub rating: i32,
    pub brand: String,
    pub image_url: Option<String>,
}

impl ProductItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Categories belong to one owner; there is no global
/// category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Shared Requests / Responses
// =============================================================================

/// Identifies a row on behalf of its owner. Used by every delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedId {
    pub id: String,
    pub user_id: String,
}

impl OwnedId {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        OwnedId {
            id: id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Identity of the row a create/update touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IdResponse {
    pub id: String,
}

// =============================================================================
// Shop Requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShopRequest {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub terms: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetShopRequest {
    pub id: String,
}

/// Lists the caller's own shops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListShopsRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Full overwrite of the editable shop fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShopRequest {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub terms: String,
}

pub type DeleteShopRequest = OwnedId;
pub type ShopsResponse = Paged<ShopItem>;

// =============================================================================
// Product Requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub user_id: String,
    pub shop_id: String,
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i32,
    pub rating: i32,
    pub brand: String,
    /// Already-uploaded image location, if any.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProductRequest {
    pub id: String,
}

/// Product search. Every filter is optional; blank strings and a zero rating
/// count as "not supplied".
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListProductsRequest {
    /// Substring of the product name.
    pub keyword: Option<String>,
    /// Substring of the category name.
    pub category: Option<String>,
    /// Exact rating.
    pub rating: Option<i32>,
    /// Substring of the brand.
    pub brand: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub page: PageRequest,
}

/// Overwrites name, description, price and stock.
///
/// `image_url`: `None` or `""` keeps the stored image; anything else
/// replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i32,
    pub image_url: Option<String>,
}

pub type DeleteProductRequest = OwnedId;
pub type ProductsResponse = Paged<ProductItem>;

// =============================================================================
// Category Requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCategoriesRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

pub type GetCategoryRequest = OwnedId;
pub type DeleteCategoryRequest = OwnedId;

/// All of an owner's categories (unpaginated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoriesResponse {
    pub items: Vec<Category>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_shop() -> Shop {
        let now = Utc::now();
        Shop {
            id: "shop-1".to_string(),
            user_id: "owner-1".to_string(),
            name: "Corner Store".to_string(),
            description: "Everything on the corner".to_string(),
            terms: "No refunds".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_shop_detail_flattens_shop_fields() {
        let detail = ShopDetail {
            shop: sample_shop(),
            products: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["id"], "shop-1");
        assert_eq!(json["terms"], "No refunds");
        assert_eq!(json["products"], serde_json::json!([]));
        assert!(json.get("deleted_at").is_none());
    }

    #[test]
    fn test_list_products_request_reads_flat_query() {
        let req: ListProductsRequest = serde_json::from_value(serde_json::json!({
            "keyword": "bean",
            "page": 2,
            "page_size": 20
        }))
        .unwrap();

        assert_eq!(req.keyword.as_deref(), Some("bean"));
        assert_eq!(req.category, None);
        assert_eq!(req.page, PageRequest::new(2, 20));
    }

    #[test]
    fn test_product_item_price() {
        let item = ProductItem {
            id: "p".to_string(),
            shop_id: "s".to_string(),
            user_id: "u".to_string(),
            category: "Coffee".to_string(),
            name: "Beans".to_string(),
            description: String::new(),
            price_cents: 1250,
            stock: 3,
            rating: 4,
            brand: "Acme".to_string(),
            image_url: None,
        };
        assert_eq!(item.price().to_string(), "12.50");
    }
}
