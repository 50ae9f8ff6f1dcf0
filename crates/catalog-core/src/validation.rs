//! # Validation Module
//!
//! Bounds checks the data model itself imposes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (outside this workspace)                       │
//! │  ├── Required fields, id formats, owner id from auth header            │
//! │  └── page / page_size parsing                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (THIS MODULE)                                     │
//! │  ├── Name present and short enough                                     │
//! │  ├── price ≥ 0, stock ≥ 0, rating in 1..=5                             │
//! │  └── Runs before any SQL is sent                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_RATING, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (shop, product, category).
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_name;
///
/// assert!(validate_name("name", "Corner Store").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text description. Empty is allowed.
pub fn validate_description(field: &str, text: &str) -> ValidationResult<()> {
    if text.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i32) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a rating against `MIN_RATING..=MAX_RATING`.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_rating;
///
/// assert!(validate_rating(5).is_ok());
/// assert!(validate_rating(0).is_err());
/// assert!(validate_rating(6).is_err());
/// ```
pub fn validate_rating(rating: i32) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING as i64,
            max: MAX_RATING as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Coffee Beans").is_ok());
        assert!(matches!(
            validate_name("name", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("description", "").is_ok());
        assert!(validate_description("description", &"d".repeat(MAX_DESCRIPTION_LEN)).is_ok());
        assert!(validate_description("description", &"d".repeat(MAX_DESCRIPTION_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(1999)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_rating_bounds() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(MIN_RATING - 1).is_err());
        assert!(validate_rating(MAX_RATING + 1).is_err());
    }
}
