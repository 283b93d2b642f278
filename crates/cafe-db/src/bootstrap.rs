//! # Schema Bootstrap
//!
//! Creates the four café tables when they are missing and seeds the table
//! list. Every statement is idempotent; there is no versioning.
//!
//! ## Tables
//! ```text
//! ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//! │ table_status │◄───────│    orders    │◄───────│ order_items  │
//! │ table_number │  FK    │ id           │  FK    │ id           │
//! │ status       │        │ table_number │        │ order_id     │
//! │ last_updated │        │ order_time   │        │ menu_id ─────┼──┐
//! └──────────────┘        │ status       │        │ quantity     │  │
//!                         └──────────────┘        └──────────────┘  │
//!                                                 ┌──────────────┐  │
//!                                                 │     menu     │◄─┘
//!                                                 │ id, title,   │ FK
//!                                                 │ price        │
//!                                                 └──────────────┘
//! ```

use cafe_core::TABLE_COUNT;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS menu (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        title   TEXT    NOT NULL,
        price   INTEGER NOT NULL CHECK (price > 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS table_status (
        table_number INTEGER PRIMARY KEY,
        status       TEXT NOT NULL DEFAULT 'free'
                     CHECK (status IN ('free', 'occupied', 'reserved')),
        last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        table_number INTEGER NOT NULL REFERENCES table_status(table_number),
        order_time   TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        status       TEXT NOT NULL DEFAULT 'active'
                     CHECK (status IN ('active', 'completed', 'cancelled'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id),
        menu_id  INTEGER NOT NULL REFERENCES menu(id),
        quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0)
    )
    "#,
];

/// Runs the DDL and inserts tables `1..=TABLE_COUNT` when none exist.
pub async fn run(pool: &SqlitePool) -> DbResult<()> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Café tables present");

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM table_status")
        .fetch_one(pool)
        .await?;

    if existing == 0 {
        let mut tx = pool.begin().await?;
        for table_number in 1..=TABLE_COUNT {
            sqlx::query("INSERT INTO table_status (table_number, status) VALUES (?1, 'free')")
                .bind(table_number)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!(tables = TABLE_COUNT, "Seeded café tables");
    }

    Ok(())
}
