//! # cafe-core: Pure Logic for Café POS
//!
//! Domain types, validation rules, the runtime record model and the four
//! export encoders. Nothing in this crate touches the database, the file
//! system or the terminal.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Café POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (cafe-pos)                      │   │
//! │  │    Role menu ──► Orders / Menu / Tables / Reports / Export      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cafe-db (Database Layer)                     │   │
//! │  │   repositories, schema introspection, export pipeline           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Dataset                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  record   │  │  export   │  │ validation│  │   │
//! │  │   │ MenuItem  │  │  Value    │  │ json, csv │  │   rules   │  │   │
//! │  │   │  Order    │  │  Record   │  │ xml, text │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Order, TableStatus, Role, ...)
//! - [`record`] - Runtime-shaped rows for table export
//! - [`export`] - JSON, CSV, XML and text encoders
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::export::{Dataset, ExportFormat};
//! use cafe_core::record::{Record, Value};
//!
//! let record: Record = [("id", Value::from(1_i64)), ("title", Value::from("Tea"))]
//!     .into_iter()
//!     .collect();
//! let dataset = Dataset {
//!     table: "menu".to_string(),
//!     columns: vec!["id".to_string(), "title".to_string()],
//!     relations: Vec::new(),
//!     records: vec![record],
//! };
//!
//! let csv = ExportFormat::Csv.encode(&dataset).unwrap();
//! assert_eq!(csv, b"id,title\n1,Tea\n");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod record;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use export::{Dataset, ExportFormat, RelationColumns};
pub use record::{Field, Record, Value};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of tables in the café, numbered from 1.
pub const TABLE_COUNT: i64 = 20;

/// Maximum quantity of a single dish on one order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a dish title, in characters.
pub const MAX_DISH_TITLE_LEN: usize = 100;
