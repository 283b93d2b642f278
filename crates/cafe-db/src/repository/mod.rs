//! # Repository Module
//!
//! Database repository implementations for the café operations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Console action                                                        │
//! │       │                                                                 │
//! │       │  db.orders().create(7)                                         │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, table_number)                                       │
//! │  ├── add_item(&self, order_id, menu_id, quantity)                      │
//! │  ├── remove_item(&self, order_id, menu_id)                             │
//! │  ├── active(&self)                                                     │
//! │  └── set_status(&self, order_id, status)                               │
//! │       │                                                                 │
//! │       │  SQL Query (business rules checked first)                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`] - Dish listing, creation and deletion
//! - [`TableRepository`] - Table statuses
//! - [`OrderRepository`] - Orders and their dish lines
//! - [`ReportRepository`] - Owner's sales report
//!
//! [`MenuRepository`]: menu::MenuRepository
//! [`TableRepository`]: tables::TableRepository
//! [`OrderRepository`]: orders::OrderRepository
//! [`ReportRepository`]: reports::ReportRepository

pub mod menu;
pub mod orders;
pub mod reports;
pub mod tables;
