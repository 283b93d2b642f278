//! # Schema Introspection
//!
//! Reads table structure from SQLite's catalog at runtime.
//!
//! ## Sources
//! ```text
//! list_tables()          sqlite_master            (type = 'table', no sqlite_%)
//! describe(t).columns    pragma_table_info(t)     ordered by cid
//! describe(t).fks        pragma_foreign_key_list  declaration order
//!                        (SQLite numbers them last-declared first)
//!                        "to" IS NULL ──► target table's primary key
//! ```
//!
//! Nothing is cached; every call reads the catalog again.

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Column used as the join target when a table has no primary key.
const IMPLICIT_KEY: &str = "rowid";

// =============================================================================
// Descriptors
// =============================================================================

/// One foreign key of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Column of the owning table.
    pub source_column: String,
    /// Referenced table.
    pub target_table: String,
    /// Referenced column.
    pub target_column: String,
}

/// Structure of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    /// Column names in declaration order.
    pub columns: Vec<String>,
    /// Foreign keys in declaration order.
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, sqlx::FromRow)]
struct ForeignKeyRow {
    target_table: String,
    source_column: String,
    target_column: Option<String>,
}

/// Quotes an identifier for interpolation into SQL (`"` doubled).
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// =============================================================================
// Catalog Queries
// =============================================================================

/// Lists user tables, excluding SQLite's internal `sqlite_%` tables.
pub async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY rowid",
    )
    .fetch_all(&mut *conn)
    .await
}

/// Describes a table's columns and foreign keys.
///
/// ## Errors
/// [`ExportError::Schema`] when the table has no columns (it does not exist)
/// or a catalog query fails.
pub async fn describe(conn: &mut SqliteConnection, table: &str) -> ExportResult<TableSchema> {
    let columns = table_columns(conn, table).await?;
    if columns.is_empty() {
        return Err(ExportError::schema(table, "table has no columns"));
    }

    let rows: Vec<ForeignKeyRow> = sqlx::query_as(
        r#"
        SELECT "table" AS target_table,
               "from"  AS source_column,
               "to"    AS target_column
        FROM pragma_foreign_key_list(?1)
        ORDER BY id DESC, seq
        "#,
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| ExportError::from_sqlx(table, e))?;

    let mut foreign_keys = Vec::with_capacity(rows.len());
    for row in rows {
        let target_column = match row.target_column {
            Some(column) => column,
            None => primary_key(conn, &row.target_table).await?,
        };
        foreign_keys.push(ForeignKey {
            source_column: row.source_column,
            target_table: row.target_table,
            target_column,
        });
    }

    debug!(
        table = %table,
        columns = columns.len(),
        foreign_keys = foreign_keys.len(),
        "Described table"
    );

    Ok(TableSchema {
        name: table.to_string(),
        columns,
        foreign_keys,
    })
}

async fn table_columns(conn: &mut SqliteConnection, table: &str) -> ExportResult<Vec<String>> {
    sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ExportError::from_sqlx(table, e))
}

/// First primary-key column of `table`, or `rowid` when it has none.
async fn primary_key(conn: &mut SqliteConnection, table: &str) -> ExportResult<String> {
    let key: Option<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk LIMIT 1")
            .bind(table)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| ExportError::from_sqlx(table, e))?;

    Ok(key.unwrap_or_else(|| IMPLICIT_KEY.to_string()))
}

// =============================================================================
// Repository
// =============================================================================

/// Pool-backed access to the catalog queries.
///
/// ## Usage
/// ```rust,ignore
/// let tables = db.schema().list_tables().await?;
/// let orders = db.schema().describe("orders").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRepository {
    pool: SqlitePool,
}

impl SchemaRepository {
    /// Creates a new SchemaRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SchemaRepository { pool }
    }

    /// Lists user tables.
    pub async fn list_tables(&self) -> ExportResult<Vec<String>> {
        let mut conn = self.acquire().await?;
        list_tables(&mut conn)
            .await
            .map_err(|e| ExportError::StoreConnection(e.to_string()))
    }

    /// Describes one table.
    pub async fn describe(&self, table: &str) -> ExportResult<TableSchema> {
        let mut conn = self.acquire().await?;
        describe(&mut conn, table).await
    }

    async fn acquire(&self) -> ExportResult<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| ExportError::StoreConnection(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
