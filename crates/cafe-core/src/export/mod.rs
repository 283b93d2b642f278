//! # Export Encoders
//!
//! Four independent, stateless encoders over one assembled [`Dataset`].
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Dataset (assembled records)                       │
//! │                                   │                                     │
//! │        ┌──────────────┬───────────┴──┬───────────────┐                  │
//! │        ▼              ▼              ▼               ▼                  │
//! │   json::encode   tabular::encode  markup::encode  text::encode          │
//! │   nested,        flattened,       <record> nodes, indented dump         │
//! │   order-kept     one row/record   recursive                             │
//! │        │              │              │               │                  │
//! │        ▼              ▼              ▼               ▼                  │
//! │     T.json          T.csv          T.xml           T.txt                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Encoders return bytes. Writing files is left to the caller (cafe-db), so
//! everything here stays pure.

pub mod json;
pub mod markup;
pub mod tabular;
pub mod text;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::record::Record;

pub use tabular::TabularLayout;

// =============================================================================
// Dataset
// =============================================================================

/// Columns of a foreign-key target table, as used for the tabular header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationColumns {
    /// Target table name; also the key the relation is stored under.
    pub target_table: String,
    /// Target table columns, in schema order.
    pub target_columns: Vec<String>,
}

/// Everything the encoders need for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Exported table name (root element, file stem, text title).
    pub table: String,
    /// Base columns of the exported table, in schema order.
    pub columns: Vec<String>,
    /// One entry per foreign key, in declaration order.
    pub relations: Vec<RelationColumns>,
    /// Assembled records.
    pub records: Vec<Record>,
}

impl Dataset {
    /// Number of assembled records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Export Format
// =============================================================================

/// Artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Text,
}

impl ExportFormat {
    /// Every format, in the order artifacts are written.
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Xml,
        ExportFormat::Text,
    ];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Text => "txt",
        }
    }

    /// Artifact file name for a table: `{table}.{ext}`.
    pub fn file_name(&self, table: &str) -> String {
        format!("{}.{}", table, self.extension())
    }

    /// Encodes the dataset in this format.
    pub fn encode(&self, dataset: &Dataset) -> CoreResult<Vec<u8>> {
        match self {
            ExportFormat::Json => json::encode(&dataset.records),
            ExportFormat::Csv => {
                let layout = TabularLayout::new(&dataset.columns, &dataset.relations, &dataset.records);
                tabular::encode(&layout, &dataset.records)
            }
            ExportFormat::Xml => markup::encode(&dataset.table, &dataset.records),
            ExportFormat::Text => Ok(text::encode(&dataset.table, &dataset.records).into_bytes()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
