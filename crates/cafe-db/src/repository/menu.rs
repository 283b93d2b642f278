//! # Menu Repository
//!
//! Database operations for dishes.
//!
//! ## Key Operations
//! - List the menu (ordered by id)
//! - Add a dish (validated title and price)
//! - Delete a dish (refused while it is on an active order)

use cafe_core::validation::{validate_dish_title, validate_price};
use cafe_core::{CoreError, MenuItem};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for menu database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.menu();
/// let latte = repo.add("Latte", 180).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Lists every dish ordered by id.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>("SELECT id, title, price FROM menu ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets a dish by id.
    ///
    /// ## Returns
    /// * `Ok(Some(MenuItem))` - Dish found
    /// * `Ok(None)` - No such dish
    pub async fn get(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>("SELECT id, title, price FROM menu WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Adds a dish.
    ///
    /// ## Rules
    /// - Title must not be blank (it is stored trimmed)
    /// - Price must be positive
    pub async fn add(&self, title: &str, price: i64) -> DbResult<MenuItem> {
        let title = validate_dish_title(title)?;
        validate_price(price)?;

        debug!(title = %title, price = price, "Adding dish");

        let id = sqlx::query("INSERT INTO menu (title, price) VALUES (?1, ?2)")
            .bind(&title)
            .bind(price)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!(id = id, title = %title, "Dish added");
        Ok(MenuItem { id, title, price })
    }

    /// Deletes a dish and returns it.
    ///
    /// ## Errors
    /// - [`CoreError::DishNotFound`] - no such dish
    /// - [`CoreError::DishInUse`] - the dish is on an active order
    /// - `ForeignKeyViolation` - past orders still reference the dish
    pub async fn delete(&self, id: i64) -> DbResult<MenuItem> {
        let item = self.get(id).await?.ok_or(CoreError::DishNotFound(id))?;

        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM order_items oi
                JOIN orders o ON oi.order_id = o.id
                WHERE oi.menu_id = ?1 AND o.status = 'active'
            )
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if in_use {
            return Err(CoreError::DishInUse { title: item.title }.into());
        }

        sqlx::query("DELETE FROM menu WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id = id, title = %item.title, "Dish deleted");
        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
