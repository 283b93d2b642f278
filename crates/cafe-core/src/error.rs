//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Domain and encoding errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cafe-db errors (separate crate)                                       │
//! │  ├── DbError          - Repository operation failures                  │
//! │  └── ExportError      - Export pipeline failures                       │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError/ExportError → AppError    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These represent business rule violations or encoder failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Table number is unknown to the café.
    #[error("Table #{0} does not exist")]
    TableNotFound(i64),

    /// Table cannot take a new order.
    ///
    /// ## When This Occurs
    /// - Creating an order for an occupied or reserved table
    #[error("Table #{table_number} is {status}, cannot open an order")]
    TableUnavailable { table_number: i64, status: String },

    /// Dish is not on the menu.
    #[error("Dish not found: {0}")]
    DishNotFound(i64),

    /// Dish is still referenced by an active order.
    #[error("Dish '{title}' is part of an active order and cannot be deleted")]
    DishInUse { title: String },

    /// Order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding a dish to a completed or cancelled order
    #[error("Order #{order_id} is {status}, cannot modify it")]
    OrderClosed { order_id: i64, status: String },

    /// Dish is not part of the order.
    #[error("Dish {menu_id} is not part of order #{order_id}")]
    DishNotInOrder { order_id: i64, menu_id: i64 },

    /// An export encoder failed to produce its document.
    #[error("Failed to encode {format} document: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an encoding error for the given format.
    pub fn encode(format: &'static str, message: impl ToString) -> Self {
        CoreError::Encode {
            format,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
