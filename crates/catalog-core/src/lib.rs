//! # catalog-core: Pure Types for the Catalog
//!
//! Entity records, request/response shapes and pagination math shared by the
//! data-access layer and whatever request layer sits in front of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (routing, auth, uploads)             │   │
//! │  │    owner id from auth header, page/page_size parsed            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed requests                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │ pagination │  │   money   │  │ validation│ │   │
//! │  │   │ Shop      │  │ PageMeta   │  │   Money   │  │  bounds   │ │   │
//! │  │   │ Product   │  │ Paged<T>   │  │           │  │  checks   │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 catalog-db (Database Layer)                     │   │
//! │  │     query builder, batch loader, repositories, migrations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Shop, Product, Category and their requests/responses
//! - [`pagination`] - PageRequest, PageMeta, Paged
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Validation errors and failure classification
//! - [`validation`] - Field bounds checks
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{PageMeta, PageRequest};
//!
//! let page = PageRequest::new(1, 10);
//! let meta = PageMeta::new(page, 25);
//!
//! assert_eq!(page.offset(), 0);
//! assert_eq!(meta.total_page, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{FailureClass, ValidationError};
pub use money::Money;
pub use pagination::{PageMeta, PageRequest, Paged};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page used when the caller sends none or a value below 1.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller sends none or a value below 1.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size served. Keeps the shop-id `IN (...)` list of a page well
/// under SQLite's bound-parameter limit.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Lowest accepted product rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted product rating.
pub const MAX_RATING: i32 = 5;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted shop description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;
