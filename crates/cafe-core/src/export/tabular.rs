//! Delimited-tabular (CSV) encoder.
//!
//! ## Flattening
//! ```text
//! Record                              CSV columns
//! ──────                              ───────────
//! id: 7                          ──►  id
//! table_number: 3                ──►  table_number
//! table_status: {                     (singular relation)
//!     table_number: 3            ──►  table_status_table_number
//!     status: occupied           ──►  table_status_status
//! }
//! order_items: [{..}, {..}]      ──►  order_items = "{..}; {..}"   (plural)
//! ```
//!
//! The header is computed once per export. A relation is plural for the whole
//! export as soon as one record carries a list for it; it then gets a single
//! synthetic column and singular values of it are written there as text.
//! Otherwise it gets one prefixed column per target-table column.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::export::RelationColumns;
use crate::record::{Field, Record};

/// Separator for plural relations joined into one cell.
pub const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum RelationShape {
    Singular(String),
    Plural(String),
}

/// Header and flattening rules for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularLayout {
    columns: Vec<String>,
    relations: Vec<RelationShape>,
    header: Vec<String>,
}

impl TabularLayout {
    /// Builds the layout from base columns, relations and the records.
    pub fn new(columns: &[String], relations: &[RelationColumns], records: &[Record]) -> Self {
        let mut header: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !header.contains(&name) {
                header.push(name);
            }
        };

        for column in columns {
            push(column.clone());
        }

        let mut shapes = Vec::with_capacity(relations.len());
        for relation in relations {
            let target = &relation.target_table;
            let plural = records
                .iter()
                .any(|record| matches!(record.get(target), Some(Field::List(_))));

            if plural {
                push(target.clone());
                shapes.push(RelationShape::Plural(target.clone()));
            } else {
                for column in &relation.target_columns {
                    push(format!("{target}_{column}"));
                }
                shapes.push(RelationShape::Singular(target.clone()));
            }
        }

        TabularLayout {
            columns: columns.to_vec(),
            relations: shapes,
            header,
        }
    }

    /// Header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Flattens one record into cells aligned with the header.
    ///
    /// Anything the record lacks becomes an empty cell. When two sources map
    /// to the same column the earlier one (base columns first) keeps it.
    pub fn flatten(&self, record: &Record) -> Vec<String> {
        let mut cells: HashMap<String, String> = HashMap::new();

        for column in &self.columns {
            if let Some(field) = record.get(column) {
                cells.entry(column.clone()).or_insert_with(|| field.to_string());
            }
        }

        for shape in &self.relations {
            match shape {
                RelationShape::Singular(target) => {
                    if let Some(Field::Nested(related)) = record.get(target) {
                        for (key, field) in related.iter() {
                            cells
                                .entry(format!("{target}_{key}"))
                                .or_insert_with(|| field.to_string());
                        }
                    }
                }
                RelationShape::Plural(target) => {
                    let text = match record.get(target) {
                        Some(Field::List(related)) => related
                            .iter()
                            .map(Record::to_string)
                            .collect::<Vec<_>>()
                            .join(LIST_SEPARATOR),
                        Some(Field::Nested(related)) => related.to_string(),
                        _ => continue,
                    };
                    cells.entry(target.clone()).or_insert(text);
                }
            }
        }

        self.header
            .iter()
            .map(|name| cells.remove(name).unwrap_or_default())
            .collect()
    }
}

/// Encodes records as CSV: header row, then one `\n`-terminated row each.
pub fn encode(layout: &TabularLayout, records: &[Record]) -> CoreResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(layout.header())
        .map_err(|e| CoreError::encode("csv", e))?;

    for record in records {
        writer
            .write_record(layout.flatten(record))
            .map_err(|e| CoreError::encode("csv", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| CoreError::encode("csv", e.error()))
}
