//! # cafe-db: Database Layer for Café POS
//!
//! SQLite access for the café: connection pool, schema bootstrap, the
//! repositories behind the role menus, and the table export pipeline.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Café POS Data Flow                               │
//! │                                                                         │
//! │  Console action (export "orders")                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cafe-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Export    │  │   │
//! │  │   │   (pool.rs)   │    │  menu, tables │    │  schema ──►  │  │   │
//! │  │   │               │    │  orders,      │    │  resolver ─► │  │   │
//! │  │   │ SqlitePool    │◄───│  reports      │    │  assembler   │  │   │
//! │  │   │ bootstrap()   │    │               │    │  ──► files   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite file            out/{table}.json|csv|xml|txt           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`bootstrap`] - Idempotent café schema
//! - [`schema`] - Table list and column / foreign-key introspection
//! - [`export`] - Related-record resolution, assembly and artifact writing
//! - [`error`] - Database and export error types
//! - [`repository`] - Menu, table, order and report repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cafe.db")).await?;
//!
//! let order = db.orders().create(7).await?;
//! let outcome = db.exporter("out").export("orders").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bootstrap;
pub mod error;
pub mod export;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ExportError, ExportResult};
pub use export::{Artifact, ExportOutcome, Exporter, Relation};
pub use pool::{Database, DbConfig};
pub use schema::{ForeignKey, TableSchema};

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::orders::OrderRepository;
pub use repository::reports::ReportRepository;
pub use repository::tables::TableRepository;
pub use schema::SchemaRepository;
