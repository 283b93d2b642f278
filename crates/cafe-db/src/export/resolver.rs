//! Related-record resolution: one foreign key, one key value.
//!
//! ```text
//! key = Null          ──► None            (no query)
//! 0 matching rows     ──► None            (relation omitted)
//! 1 matching row      ──► Single(record)
//! 2+ matching rows    ──► Many(records)   (store order)
//! ```

use cafe_core::{Field, Record, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::export::assembler::decode_row;
use crate::schema::{self, quote_identifier, ForeignKey};

/// Rows of a target table matching one key.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    Single(Record),
    Many(Vec<Record>),
}

impl From<Relation> for Field {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Single(record) => Field::Nested(record),
            Relation::Many(records) => Field::List(records),
        }
    }
}

/// Fetches the rows of `fk.target_table` whose `fk.target_column` equals `key`.
///
/// Rows come back in the store's natural order; no ORDER BY is applied.
pub async fn resolve(
    conn: &mut SqliteConnection,
    fk: &ForeignKey,
    key: &Value,
) -> ExportResult<Option<Relation>> {
    if key.is_null() {
        return Ok(None);
    }

    let target = schema::describe(conn, &fk.target_table).await?;

    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        target
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", "),
        quote_identifier(&target.name),
        quote_identifier(&fk.target_column),
    );

    let rows = bind_value(sqlx::query(&sql), key)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ExportError::from_sqlx(&fk.target_table, e))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let values = decode_row(row).map_err(|e| ExportError::from_sqlx(&fk.target_table, e))?;
        records.push(Record::from_row(&target.columns, values));
    }

    debug!(
        target = %fk.target_table,
        column = %fk.target_column,
        matches = records.len(),
        "Resolved relation"
    );

    Ok(match records.len() {
        0 => None,
        1 => records.pop().map(Relation::Single),
        _ => Some(Relation::Many(records)),
    })
}

/// Binds a scalar with its own storage class so SQLite compares like with like.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Blob(v) => query.bind(v.clone()),
    }
}
