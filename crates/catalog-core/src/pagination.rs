//! # Pagination
//!
//! Page requests and the metadata attached to every paged response.
//!
//! ## How a Page Is Computed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page=3, page_size=10                                                  │
//! │                                                                         │
//! │  LIMIT  = page_size              = 10                                  │
//! │  OFFSET = page_size * (page - 1) = 20                                  │
//! │                                                                         │
//! │  SELECT COUNT(*) OVER() AS total_data, ...   ← same statement          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_data = 25  →  total_page = ceil(25 / 10) = 3                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The total comes from a window count in the same query as the rows, so the
//! count and the page always describe the same snapshot.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Page Request
// =============================================================================

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const fn new(page: u32, page_size: u32) -> Self {
        PageRequest { page, page_size }
    }

    /// Replaces values below 1 with the defaults and caps the page size at
    /// [`MAX_PAGE_SIZE`].
    ///
    /// ```rust
    /// use catalog_core::PageRequest;
    ///
    /// let page = PageRequest::new(0, 0).normalized();
    /// assert_eq!(page, PageRequest::new(1, 10));
    ///
    /// let page = PageRequest::new(2, 50_000).normalized();
    /// assert_eq!(page, PageRequest::new(2, 100));
    /// ```
    pub fn normalized(self) -> Self {
        PageRequest {
            page: if self.page < 1 { DEFAULT_PAGE } else { self.page },
            page_size: match self.page_size {
                0 => DEFAULT_PAGE_SIZE,
                size => size.min(MAX_PAGE_SIZE),
            },
        }
    }

    /// Row limit for this page.
    #[inline]
    pub const fn limit(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip: `page_size * (page - 1)`. Page 0 is treated as page 1.
    #[inline]
    pub const fn offset(&self) -> u64 {
        self.page_size as u64 * self.page.saturating_sub(1) as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

// =============================================================================
// Page Meta
// =============================================================================

/// Pagination metadata returned with every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    /// Rows matching the filters, ignoring LIMIT/OFFSET.
    #[ts(type = "number")]
    pub total_data: u64,
    #[ts(type = "number")]
    pub total_page: u64,
}

impl PageMeta {
    pub fn new(page: PageRequest, total_data: u64) -> Self {
        PageMeta {
            page: page.page,
            page_size: page.page_size,
            total_data,
            total_page: total_pages(total_data, page.page_size),
        }
    }
}

/// `ceil(total / page_size)`, or 0 when `page_size` is 0.
#[inline]
pub const fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

// =============================================================================
// Paged
// =============================================================================

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: PageRequest, total_data: u64) -> Self {
        Paged {
            items,
            meta: PageMeta::new(page, total_data),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(31, 10), 4);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(7, 1), 7);
    }

    #[test]
    fn test_total_pages_zero_cases() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(25, 0), 0);
    }

    #[test]
    fn test_total_pages_matches_ceil_for_small_grid() {
        for total in 0..60u64 {
            for size in 1..12u32 {
                let expected = (total as f64 / size as f64).ceil() as u64;
                assert_eq!(total_pages(total, size), expected, "{total}/{size}");
            }
        }
    }

    #[test]
    fn test_first_page_of_25() {
        let page = PageRequest::new(1, 10);
        let meta = PageMeta::new(page, 25);

        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
        assert_eq!(meta.total_page, 3);
        assert_eq!(meta.total_data, 25);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(2, 7).offset(), 7);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_normalized_defaults() {
        assert_eq!(PageRequest::new(0, 0).normalized(), PageRequest::new(1, 10));
        assert_eq!(PageRequest::new(0, 25).normalized(), PageRequest::new(1, 25));
        assert_eq!(PageRequest::new(4, 0).normalized(), PageRequest::new(4, 10));
        assert_eq!(PageRequest::new(2, 5).normalized(), PageRequest::new(2, 5));
        assert_eq!(PageRequest::default(), PageRequest::new(1, 10));
    }

    #[test]
    fn test_normalized_caps_page_size() {
        assert_eq!(
            PageRequest::new(1, MAX_PAGE_SIZE + 1).normalized(),
            PageRequest::new(1, MAX_PAGE_SIZE)
        );
        assert_eq!(
            PageRequest::new(u32::MAX, u32::MAX).normalized(),
            PageRequest::new(u32::MAX, MAX_PAGE_SIZE)
        );
        assert_eq!(
            PageRequest::new(3, MAX_PAGE_SIZE).normalized(),
            PageRequest::new(3, MAX_PAGE_SIZE)
        );
    }

    #[test]
    fn test_paged_serialized_shape() {
        let paged = Paged::new(vec!["a", "b"], PageRequest::new(1, 2), 5);
        let json = serde_json::to_value(&paged).unwrap();

        assert_eq!(json["items"], serde_json::json!(["a", "b"]));
        assert_eq!(json["meta"]["total_data"], 5);
        assert_eq!(json["meta"]["total_page"], 3);
        assert_eq!(json["meta"]["page_size"], 2);
    }
}
