//! # Application Error Type
//!
//! What the operator sees when an action fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session action / subcommand                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ──► CoreError ──► DbError ─────┐                       │
//! │                                                 ├──► AppError ──► print │
//! │  ExportError ───────────────────────────────────┘    { code, message }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures are logged with their details and shown as a short
//! generic message.

use std::fmt;
use std::io;

use cafe_core::{CoreError, ValidationError};
use cafe_db::{DbError, ExportError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable category
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Table, dish or order does not exist
    NotFound,

    /// Input failed a domain rule
    ValidationError,

    /// Operation not allowed in the current state
    BusinessLogic,

    /// Store operation failed
    DatabaseError,

    /// Export could not be completed
    ExportFailed,

    /// Operator typed something unusable
    InvalidInput,

    /// Input stream ended
    InputClosed,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates the error raised when input runs out mid-prompt.
    pub fn input_closed() -> Self {
        AppError::new(ErrorCode::InputClosed, "Input closed")
    }

    /// Whether the session should stop instead of reporting the error.
    pub fn is_input_closed(&self) -> bool {
        self.code == ErrorCode::InputClosed
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                AppError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(
                    ErrorCode::BusinessLogic,
                    "Record is still referenced by other records",
                )
            }
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Domain(e) => e.into(),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::TableNotFound(_)
            | CoreError::DishNotFound(_)
            | CoreError::OrderNotFound(_)
            | CoreError::DishNotInOrder { .. } => ErrorCode::NotFound,
            CoreError::TableUnavailable { .. }
            | CoreError::DishInUse { .. }
            | CoreError::OrderClosed { .. } => ErrorCode::BusinessLogic,
            CoreError::Encode { .. } => ErrorCode::ExportFailed,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };

        match err {
            CoreError::Validation(e) => AppError::new(code, e.to_string()),
            other => AppError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::TableNotFound(_) => AppError::new(ErrorCode::NotFound, err.to_string()),
            ExportError::StoreConnection(ref e) => {
                tracing::error!("Export could not reach the store: {}", e);
                AppError::new(ErrorCode::DatabaseError, err.to_string())
            }
            ExportError::UnsafeFileName(_)
            | ExportError::Schema { .. }
            | ExportError::Io { .. }
            | ExportError::Encode(_) => {
                tracing::error!(error = %err, "Export failed");
                AppError::new(ErrorCode::ExportFailed, format!("Export failed: {}", err))
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::Internal, err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::new(ErrorCode::Internal, format!("I/O error: {}", err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for console operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err: AppError = DbError::Domain(CoreError::DishNotFound(9)).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Dish not found: 9");

        let err: AppError = CoreError::OrderClosed {
            order_id: 4,
            status: "completed".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_validation_message_is_unwrapped() {
        let err: AppError = CoreError::Validation(ValidationError::Required {
            field: "title".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.message.starts_with("Validation error"));
    }

    #[test]
    fn test_export_errors() {
        let err: AppError = ExportError::TableNotFound("ghosts".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("ghosts"));

        let err: AppError = ExportError::schema("orders", "boom").into();
        assert_eq!(err.code, ErrorCode::ExportFailed);

        let err: AppError = ExportError::UnsafeFileName("../escaped".to_string()).into();
        assert_eq!(err.code, ErrorCode::ExportFailed);
    }

    #[test]
    fn test_store_details_are_hidden() {
        let err: AppError = DbError::QueryFailed("near \"SELEC\": syntax error".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(AppError::invalid_input("Invalid choice")).unwrap();
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["message"], "Invalid choice");
    }
}
