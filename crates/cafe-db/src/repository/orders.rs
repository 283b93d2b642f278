//! # Order Repository
//!
//! Orders and their dish lines.
//!
//! ## Order Lifecycle
//! ```text
//!   create(table) ──► active ──┬──► completed ─┐
//!   (table: free → occupied)   │               ├──► table freed
//!                              └──► cancelled ─┘
//!
//!   add_item / remove_item only while active
//! ```

use cafe_core::validation::{validate_quantity, validate_table_number};
use cafe_core::{CoreError, Order, OrderDetails, OrderLine, OrderStatus, TableState};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Repository for order operations.
///
/// ## Usage
/// ```rust,ignore
/// let order = db.orders().create(7).await?;
/// db.orders().add_item(order.id, dish_id, 2).await?;
/// db.orders().set_status(order.id, OrderStatus::Completed).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Opens an order for a free table and marks the table occupied.
    ///
    /// ## Errors
    /// - [`CoreError::TableNotFound`] - no such table
    /// - [`CoreError::TableUnavailable`] - table is occupied or reserved
    pub async fn create(&self, table_number: i64) -> DbResult<Order> {
        validate_table_number(table_number)?;

        let mut tx = self.pool.begin().await?;

        let state: Option<TableState> =
            sqlx::query_scalar("SELECT status FROM table_status WHERE table_number = ?1")
                .bind(table_number)
                .fetch_optional(&mut *tx)
                .await?;

        match state {
            None => return Err(CoreError::TableNotFound(table_number).into()),
            Some(TableState::Free) => {}
            Some(other) => {
                return Err(CoreError::TableUnavailable {
                    table_number,
                    status: other.to_string(),
                }
                .into())
            }
        }

        let order_id = sqlx::query("INSERT INTO orders (table_number, status) VALUES (?1, ?2)")
            .bind(table_number)
            .bind(OrderStatus::Active)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        sqlx::query(
            "UPDATE table_status SET status = ?1, last_updated = CURRENT_TIMESTAMP \
             WHERE table_number = ?2",
        )
        .bind(TableState::Occupied)
        .bind(table_number)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = order_id, table_number = table_number, "Order created");

        self.get(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Gets an order by id.
    pub async fn get(&self, order_id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, table_number, order_time, status FROM orders WHERE id = ?1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Adds `quantity` of a dish to an active order.
    ///
    /// Every call adds a new line, even for a dish already on the order.
    pub async fn add_item(&self, order_id: i64, menu_id: i64, quantity: i64) -> DbResult<()> {
        validate_quantity(quantity)?;

        let order = self.open_order(order_id).await?;

        let dish_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM menu WHERE id = ?1)")
            .bind(menu_id)
            .fetch_one(&self.pool)
            .await?;
        if !dish_exists {
            return Err(CoreError::DishNotFound(menu_id).into());
        }

        debug!(order_id = order.id, menu_id = menu_id, quantity = quantity, "Adding order line");

        sqlx::query("INSERT INTO order_items (order_id, menu_id, quantity) VALUES (?1, ?2, ?3)")
            .bind(order.id)
            .bind(menu_id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes every line of a dish from an order.
    ///
    /// ## Returns
    /// Number of removed lines (at least one).
    pub async fn remove_item(&self, order_id: i64, menu_id: i64) -> DbResult<u64> {
        let removed = sqlx::query("DELETE FROM order_items WHERE order_id = ?1 AND menu_id = ?2")
            .bind(order_id)
            .bind(menu_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed == 0 {
            return Err(CoreError::DishNotInOrder { order_id, menu_id }.into());
        }

        info!(order_id = order_id, menu_id = menu_id, lines = removed, "Dish removed from order");
        Ok(removed)
    }

    /// Dish lines of an order, in insertion order.
    pub async fn lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT oi.menu_id, m.title, m.price, oi.quantity
            FROM order_items oi
            JOIN menu m ON oi.menu_id = m.id
            WHERE oi.order_id = ?1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Active orders, newest first, each with its lines.
    pub async fn active(&self) -> DbResult<Vec<OrderDetails>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, table_number, order_time, status
            FROM orders
            WHERE status = ?1
            ORDER BY order_time DESC, id DESC
            "#,
        )
        .bind(OrderStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let lines = self.lines(order.id).await?;
            details.push(OrderDetails { order, lines });
        }

        Ok(details)
    }

    /// Changes an order's status.
    ///
    /// Completing or cancelling an order frees its table.
    pub async fn set_status(&self, order_id: i64, status: OrderStatus) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let table_number: Option<i64> =
            sqlx::query_scalar("SELECT table_number FROM orders WHERE id = ?1")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        let table_number = table_number.ok_or(CoreError::OrderNotFound(order_id))?;

        sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if status.releases_table() {
            sqlx::query(
                "UPDATE table_status SET status = ?1, last_updated = CURRENT_TIMESTAMP \
                 WHERE table_number = ?2",
            )
            .bind(TableState::Free)
            .bind(table_number)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = order_id,
            status = %status,
            table_freed = status.releases_table(),
            "Order status changed"
        );

        self.get(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Loads an order and checks it still accepts changes.
    async fn open_order(&self, order_id: i64) -> DbResult<Order> {
        let order = self
            .get(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        if order.status != OrderStatus::Active {
            return Err(CoreError::OrderClosed {
                order_id,
                status: order.status.to_string(),
            }
            .into());
        }

        Ok(order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
