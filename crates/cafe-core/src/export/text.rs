//! Human-readable text dump.
//!
//! ```text
//! Table: orders
//! ==================================================
//!
//! Record #1:
//! ------------------------------
//!   id: 7
//!   table_status:
//!     status: occupied
//!
//! ```
//!
//! Scalars always keep the `key: value` shape; a null is an empty value
//! after `key: `.

use std::fmt;

use crate::record::{Field, Record};

const TITLE_RULE_WIDTH: usize = 50;
const RECORD_RULE_WIDTH: usize = 30;
const INDENT: &str = "  ";

/// Renders records as an indented plain-text dump.
pub fn encode(table: &str, records: &[Record]) -> String {
    TextDump { table, records }.to_string()
}

struct TextDump<'a> {
    table: &'a str,
    records: &'a [Record],
}

impl fmt::Display for TextDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.table)?;
        writeln!(f, "{}", "=".repeat(TITLE_RULE_WIDTH))?;
        writeln!(f)?;

        for (index, record) in self.records.iter().enumerate() {
            writeln!(f, "Record #{}:", index + 1)?;
            writeln!(f, "{}", "-".repeat(RECORD_RULE_WIDTH))?;
            dump(f, record, 1)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn dump(f: &mut fmt::Formatter<'_>, record: &Record, level: usize) -> fmt::Result {
    let indent = INDENT.repeat(level);

    for (key, field) in record.iter() {
        match field {
            Field::Scalar(value) => writeln!(f, "{indent}{key}: {value}")?,
            Field::Nested(related) => {
                writeln!(f, "{indent}{key}:")?;
                dump(f, related, level + 1)?;
            }
            Field::List(related) => {
                writeln!(f, "{indent}{key}:")?;
                for item in related {
                    dump(f, item, level + 1)?;
                }
            }
        }
    }
    Ok(())
}
