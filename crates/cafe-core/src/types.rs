//! # Domain Types
//!
//! Core domain types used throughout Café POS.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │   TableStatus   │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  table_number   │   │  id             │       │
//! │  │  title          │   │  status         │◄──│  table_number   │       │
//! │  │  price          │   │  last_updated   │   │  order_time     │       │
//! │  └────────▲────────┘   └─────────────────┘   │  status         │       │
//! │           │                                   └────────▲────────┘       │
//! │           │            ┌─────────────────┐             │                │
//! │           └────────────│   order_items   │─────────────┘                │
//! │                        │  menu_id        │                              │
//! │                        │  order_id       │                              │
//! │                        │  quantity       │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are whole currency units stored as integers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Table State
// =============================================================================

/// Occupancy state of a café table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    /// Table can take a new order.
    Free,
    /// Guests are seated and an order is open.
    Occupied,
    /// Held for a reservation.
    Reserved,
}

impl TableState {
    /// All states, in menu order.
    pub const ALL: [TableState; 3] = [TableState::Free, TableState::Occupied, TableState::Reserved];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableState::Free => "free",
            TableState::Occupied => "occupied",
            TableState::Reserved => "reserved",
        }
    }

    /// Human-readable label for the console.
    pub fn label(&self) -> &'static str {
        match self {
            TableState::Free => "Free",
            TableState::Occupied => "Occupied",
            TableState::Reserved => "Reserved",
        }
    }
}

impl Default for TableState {
    fn default() -> Self {
        TableState::Free
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableState::ALL
            .into_iter()
            .find(|state| state.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "table status".to_string(),
                allowed: TableState::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// A row of the `table_status` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TableStatus {
    /// Table number (1-20).
    pub table_number: i64,

    /// Current occupancy state.
    pub status: TableState,

    /// When the status last changed.
    pub last_updated: Option<NaiveDateTime>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish on the café menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub title: String,
    /// Price in whole currency units.
    pub price: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is open; dishes can be added or removed.
    Active,
    /// Order was served and paid.
    Completed,
    /// Order was abandoned.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in menu order.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Active,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether moving an order into this status frees its table.
    pub fn releases_table(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Active
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "order status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Order
// =============================================================================

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_number: i64,
    pub order_time: Option<NaiveDateTime>,
    pub status: OrderStatus,
}

/// One dish line of an order, joined with the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub menu_id: i64,
    pub title: String,
    pub price: i64,
    pub quantity: i64,
}

impl OrderLine {
    /// Price × quantity.
    #[inline]
    pub fn line_total(&self) -> i64 {
        self.price * self.quantity
    }
}

/// An active order with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderDetails {
    /// Sum of all line totals.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Number of tables in a given status.
///
/// `status` stays a plain string so unexpected values in the store are still
/// reported instead of failing the whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TableStatusCount {
    pub status: String,
    pub count: i64,
}

/// A dish ranked by total ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PopularDish {
    pub title: String,
    pub quantity: i64,
}

/// Owner's summary report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Revenue over completed orders.
    pub total_revenue: i64,
    pub completed_orders: i64,
    pub active_orders: i64,
    pub tables_by_status: Vec<TableStatusCount>,
    /// Top dishes by quantity, most popular first.
    pub popular_dishes: Vec<PopularDish>,
}

// =============================================================================
// Roles & Actions
// =============================================================================

/// Staff role chosen at the login menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Waiter,
    KitchenBar,
    Admin,
    Owner,
}

/// An operation offered in a role menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ShowMenu,
    AddDish,
    DeleteDish,
    CreateOrder,
    AddDishToOrder,
    RemoveDishFromOrder,
    ShowActiveOrders,
    ChangeOrderStatus,
    ShowTables,
    ChangeTableStatus,
    ViewReports,
    ExportTable,
}

impl Role {
    /// All roles, in login-menu order.
    pub const ALL: [Role; 4] = [Role::Waiter, Role::KitchenBar, Role::Admin, Role::Owner];

    /// Menu heading.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Waiter => "Waiter",
            Role::KitchenBar => "Kitchen / Bar",
            Role::Admin => "Administrator",
            Role::Owner => "Owner",
        }
    }

    /// Actions available to this role, in menu order.
    pub fn actions(&self) -> &'static [Action] {
        use Action::*;

        match self {
            Role::Waiter => &[
                ShowMenu,
                CreateOrder,
                AddDishToOrder,
                RemoveDishFromOrder,
                ShowActiveOrders,
                ChangeOrderStatus,
                ShowTables,
                ChangeTableStatus,
            ],
            Role::KitchenBar => &[ShowMenu, ShowActiveOrders, ChangeOrderStatus, ShowTables],
            Role::Admin => &[
                ShowMenu,
                AddDish,
                DeleteDish,
                CreateOrder,
                AddDishToOrder,
                RemoveDishFromOrder,
                ShowActiveOrders,
                ChangeOrderStatus,
                ShowTables,
                ChangeTableStatus,
                ExportTable,
            ],
            Role::Owner => &[
                ShowMenu,
                AddDish,
                DeleteDish,
                ShowActiveOrders,
                ChangeOrderStatus,
                ShowTables,
                ChangeTableStatus,
                ViewReports,
                ExportTable,
            ],
        }
    }

    /// Whether this role may perform the action.
    pub fn can(&self, action: Action) -> bool {
        self.actions().contains(&action)
    }
}

impl Action {
    /// Menu entry text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::ShowMenu => "Show menu",
            Action::AddDish => "Add dish to menu",
            Action::DeleteDish => "Delete dish from menu",
            Action::CreateOrder => "Create new order",
            Action::AddDishToOrder => "Add dish to order",
            Action::RemoveDishFromOrder => "Remove dish from order",
            Action::ShowActiveOrders => "Show active orders",
            Action::ChangeOrderStatus => "Change order status",
            Action::ShowTables => "Show table statuses",
            Action::ChangeTableStatus => "Change table status",
            Action::ViewReports => "View reports",
            Action::ExportTable => "Export table data",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
