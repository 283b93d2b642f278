//! # Validation Module
//!
//! Input validation utilities for Café POS.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console prompt                                               │
//! │  └── Parsing (is it a number?)                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules (table range, positive price, ...)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{validate_table_number, validate_quantity};
//!
//! validate_table_number(7).unwrap();
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_DISH_TITLE_LEN, MAX_ITEM_QUANTITY, TABLE_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a dish title.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
///
/// ## Returns
/// The trimmed title.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_dish_title;
///
/// assert_eq!(validate_dish_title("  Latte ").unwrap(), "Latte");
/// assert!(validate_dish_title("   ").is_err());
/// ```
pub fn validate_dish_title(title: &str) -> ValidationResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_DISH_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_DISH_TITLE_LEN,
        });
    }

    Ok(title.to_string())
}

/// Validates a table name supplied for export.
///
/// Only checks that something was given; existence is checked against the
/// store at export time.
pub fn validate_table_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "table name".to_string(),
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a café table number.
///
/// ## Rules
/// - Between 1 and [`TABLE_COUNT`] inclusive
pub fn validate_table_number(table_number: i64) -> ValidationResult<()> {
    if !(1..=TABLE_COUNT).contains(&table_number) {
        return Err(ValidationError::OutOfRange {
            field: "table number".to_string(),
            min: 1,
            max: TABLE_COUNT,
        });
    }

    Ok(())
}

/// Validates a dish price.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_price;
///
/// assert!(validate_price(150).is_ok());
/// assert!(validate_price(0).is_err());
/// ```
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
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
    fn test_validate_dish_title() {
        assert_eq!(validate_dish_title("Cappuccino").unwrap(), "Cappuccino");
        assert_eq!(validate_dish_title("  Чай  ").unwrap(), "Чай");
        assert!(validate_dish_title("").is_err());
        assert!(validate_dish_title(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_table_number() {
        assert!(validate_table_number(1).is_ok());
        assert!(validate_table_number(20).is_ok());
        assert!(validate_table_number(0).is_err());
        assert!(validate_table_number(21).is_err());
        assert!(validate_table_number(-3).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(1).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_table_name() {
        assert_eq!(validate_table_name(" orders ").unwrap(), "orders");
        assert!(validate_table_name("").is_err());
    }
}
