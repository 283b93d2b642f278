//! # Report Repository
//!
//! Aggregates for the owner's report.

use cafe_core::{OrderStatus, PopularDish, SalesReport, TableStatusCount};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Number of dishes in the popularity ranking.
pub const POPULAR_DISHES_LIMIT: i64 = 5;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the sales report.
    ///
    /// ## Contents
    /// - Revenue over completed orders (price × quantity)
    /// - Completed and active order counts
    /// - Table counts per status
    /// - Top dishes by ordered quantity, across all orders
    pub async fn sales_report(&self) -> DbResult<SalesReport> {
        let total_revenue: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(m.price * oi.quantity), 0)
            FROM order_items oi
            JOIN menu m ON oi.menu_id = m.id
            JOIN orders o ON oi.order_id = o.id
            WHERE o.status = ?1
            "#,
        )
        .bind(OrderStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        let completed_orders = self.count_orders(OrderStatus::Completed).await?;
        let active_orders = self.count_orders(OrderStatus::Active).await?;

        let tables_by_status = sqlx::query_as::<_, TableStatusCount>(
            "SELECT status, COUNT(*) AS count FROM table_status GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let popular_dishes = sqlx::query_as::<_, PopularDish>(
            r#"
            SELECT m.title, SUM(oi.quantity) AS quantity
            FROM order_items oi
            JOIN menu m ON oi.menu_id = m.id
            GROUP BY m.id
            ORDER BY quantity DESC, m.id
            LIMIT ?1
            "#,
        )
        .bind(POPULAR_DISHES_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            revenue = total_revenue,
            completed = completed_orders,
            active = active_orders,
            "Sales report built"
        );

        Ok(SalesReport {
            total_revenue,
            completed_orders,
            active_orders,
            tables_by_status,
            popular_dishes,
        })
    }

    async fn count_orders(&self, status: OrderStatus) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
