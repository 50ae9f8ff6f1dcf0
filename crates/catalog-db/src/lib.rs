//! # catalog-db: Storage Layer for the Catalog
//!
//! Shops, products and categories for many owners in one SQLite database,
//! accessed asynchronously through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Request layer (authenticated owner id, typed request)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Repositories │    │  FilterQuery  │    │ Batch Loader │  │   │
//! │  │   │               │───►│  (query.rs)   │    │  (batch.rs)  │  │   │
//! │  │   │ ShopRepo      │    │ WHERE/LIMIT   │    │ IN (...) +   │  │   │
//! │  │   │ ProductRepo   │───────────────────────►│ group by id  │  │   │
//! │  │   │ CategoryRepo  │    └───────────────┘    └──────────────┘  │   │
//! │  │   └───────┬───────┘                                            │   │
//! │  │           │          ┌───────────────┐    ┌──────────────┐    │   │
//! │  │           └─────────►│   Database    │    │  Migrations  │    │   │
//! │  │                      │   (pool.rs)   │    │  (embedded)  │    │   │
//! │  │                      └───────────────┘    └──────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Pool settings, from code or `CATALOG_*` environment variables
//! - [`pool`] - Connection pool creation, repository access
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and their classification
//! - [`query`] - Conditional WHERE builder with positional placeholders
//! - [`batch`] - One-query loading of products for a page of shops
//! - [`repository`] - One repository per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let shops = db.shops().list(&ListShopsRequest {
//!     user_id: owner_id,
//!     page: PageRequest::new(1, 10),
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use error::{DbError, DbResult};
pub use pool::Database;

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::shop::ShopRepository;
