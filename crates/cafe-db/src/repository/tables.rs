//! # Table Repository
//!
//! Occupancy of the café's tables.

use cafe_core::validation::validate_table_number;
use cafe_core::{CoreError, TableState, TableStatus};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Repository for `table_status` operations.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Lists all tables ordered by number.
    pub async fn list(&self) -> DbResult<Vec<TableStatus>> {
        let tables = sqlx::query_as::<_, TableStatus>(
            "SELECT table_number, status, last_updated FROM table_status ORDER BY table_number",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Gets one table.
    pub async fn get(&self, table_number: i64) -> DbResult<Option<TableStatus>> {
        let table = sqlx::query_as::<_, TableStatus>(
            "SELECT table_number, status, last_updated FROM table_status WHERE table_number = ?1",
        )
        .bind(table_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Sets a table's status and stamps `last_updated`.
    ///
    /// ## Errors
    /// - Validation error for a number outside `1..=TABLE_COUNT`
    /// - [`CoreError::TableNotFound`] when the row is missing
    pub async fn set_status(&self, table_number: i64, status: TableState) -> DbResult<()> {
        validate_table_number(table_number)?;

        let result = sqlx::query(
            "UPDATE table_status SET status = ?1, last_updated = CURRENT_TIMESTAMP \
             WHERE table_number = ?2",
        )
        .bind(status)
        .bind(table_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::TableNotFound(table_number).into());
        }

        info!(table_number = table_number, status = %status, "Table status changed");
        Ok(())
    }
}
