//! Record assembly: base rows plus one level of related rows.
//!
//! ```text
//! for row in SELECT columns FROM table:
//!     record = zip(columns, row)
//!     for fk in foreign_keys (declaration order):
//!         key = raw row[fk.source_column]
//!         resolve(fk, key) ──► Some ──► record[fk.target_table] = relation
//! ```
//!
//! Keys always come from the raw row, so a relation stored under a name that
//! shadows a base column never feeds a later lookup. Related rows are never
//! expanded further.

use cafe_core::{Record, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, TypeInfo, ValueRef};

use crate::error::{ExportError, ExportResult};
use crate::export::resolver;
use crate::schema::{quote_identifier, TableSchema};

/// Reads every row of `schema.name` and attaches its related rows.
pub async fn assemble(conn: &mut SqliteConnection, schema: &TableSchema) -> ExportResult<Vec<Record>> {
    let sql = format!(
        "SELECT {} FROM {}",
        schema
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", "),
        quote_identifier(&schema.name),
    );

    let rows = sqlx::query(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ExportError::from_sqlx(&schema.name, e))?;

    let mut records = Vec::with_capacity(rows.len());

    for row in &rows {
        let values = decode_row(row).map_err(|e| ExportError::from_sqlx(&schema.name, e))?;
        let mut record = Record::from_row(&schema.columns, values.iter().cloned());

        for fk in &schema.foreign_keys {
            let Some(position) = schema.columns.iter().position(|c| *c == fk.source_column) else {
                continue;
            };
            let key = values.get(position).unwrap_or(&Value::Null);

            if let Some(relation) = resolver::resolve(conn, fk, key).await? {
                record.insert(fk.target_table.as_str(), relation);
            }
        }

        records.push(record);
    }

    Ok(records)
}

/// Decodes every column of a row by its runtime storage class.
pub(crate) fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    let mut values = Vec::with_capacity(row.len());

    for index in 0..row.len() {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            values.push(Value::Null);
            continue;
        }

        let class = raw.type_info().name().to_string();
        let value = match class.as_str() {
            "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked::<i64, _>(index)?),
            "REAL" => Value::Real(row.try_get_unchecked::<f64, _>(index)?),
            "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
            _ => Value::Text(row.try_get_unchecked::<String, _>(index)?),
        };
        values.push(value);
    }

    Ok(values)
}
