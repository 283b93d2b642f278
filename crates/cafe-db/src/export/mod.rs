//! # Table Export Pipeline
//!
//! Turns one table into four files.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Exporter::export("orders")                                            │
//! │       │                                                                 │
//! │       │  acquire ONE pooled connection (released on every exit)        │
//! │       ▼                                                                 │
//! │  list_tables() ── not listed ──► TableNotFound (nothing written)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  describe(orders) ──► columns + foreign keys                           │
//! │  describe(target) ──► target columns (tabular header)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  assemble() ──► per row × fk: resolve() ──► Vec<Record>                │
//! │       │                                                                 │
//! │       ▼  connection released                                            │
//! │  Dataset ──► json / csv / xml / text encoders ──► out/orders.{ext}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifacts are overwritten on repeated export. A failure while writing may
//! leave earlier artifacts of the same export on disk.

pub mod assembler;
pub mod resolver;

use std::path::{Component, Path, PathBuf};

use cafe_core::{Dataset, ExportFormat, RelationColumns};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{ExportError, ExportResult};
use crate::schema;

pub use resolver::Relation;

// =============================================================================
// Outcome
// =============================================================================

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub format: ExportFormat,
    pub path: PathBuf,
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub table: String,
    /// Number of exported records.
    pub records: usize,
    /// Written files, in [`ExportFormat::ALL`] order.
    pub artifacts: Vec<Artifact>,
}

impl ExportOutcome {
    /// Path of the artifact in `format`, if written.
    pub fn path(&self, format: ExportFormat) -> Option<&Path> {
        self.artifacts
            .iter()
            .find(|a| a.format == format)
            .map(|a| a.path.as_path())
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// Exports tables into an output directory.
///
/// ## Usage
/// ```rust,ignore
/// let outcome = db.exporter("out").export("orders").await?;
/// println!("{} records", outcome.records);
/// ```
#[derive(Debug, Clone)]
pub struct Exporter {
    pool: SqlitePool,
    out_dir: PathBuf,
}

impl Exporter {
    /// Creates an exporter writing into `out_dir` (created on first export).
    pub fn new(pool: SqlitePool, out_dir: impl Into<PathBuf>) -> Self {
        Exporter {
            pool,
            out_dir: out_dir.into(),
        }
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Exports `table` in every format.
    ///
    /// ## Errors
    /// - [`ExportError::TableNotFound`] - not a user table; nothing is written
    /// - [`ExportError::UnsafeFileName`] - table name would leave the output
    ///   directory; nothing is written
    /// - [`ExportError::StoreConnection`] - no connection available
    /// - [`ExportError::Schema`] - introspection or a read failed
    /// - [`ExportError::Io`] / [`ExportError::Encode`] - writing failed
    pub async fn export(&self, table: &str) -> ExportResult<ExportOutcome> {
        info!(table = %table, out = %self.out_dir.display(), "Exporting table");

        let dataset = self.dataset(table).await?;
        let outcome = self.write(&dataset).await?;

        info!(
            table = %table,
            records = outcome.records,
            artifacts = outcome.artifacts.len(),
            "Export complete"
        );
        Ok(outcome)
    }

    /// Assembles the records of `table` without writing anything.
    pub async fn dataset(&self, table: &str) -> ExportResult<Dataset> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ExportError::StoreConnection(e.to_string()))?;

        // `conn` returns to the pool when dropped, on success and on `?`
        build_dataset(&mut conn, table).await
    }

    async fn write(&self, dataset: &Dataset) -> ExportResult<ExportOutcome> {
        let paths = ExportFormat::ALL
            .into_iter()
            .map(|format| {
                self.artifact_path(&dataset.table, format)
                    .map(|path| (format, path))
            })
            .collect::<ExportResult<Vec<_>>>()?;

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| ExportError::io(&self.out_dir, e))?;

        let mut artifacts = Vec::with_capacity(paths.len());

        for (format, path) in paths {
            let bytes = format.encode(dataset).inspect_err(|e| {
                warn!(format = %format, error = %e, "Encoding failed");
            })?;

            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| ExportError::io(&path, e))?;

            debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
            artifacts.push(Artifact { format, path });
        }

        Ok(ExportOutcome {
            table: dataset.table.clone(),
            records: dataset.len(),
            artifacts,
        })
    }

    /// `out_dir/{table}.{ext}`, provided the file name is a single plain
    /// path component.
    fn artifact_path(&self, table: &str, format: ExportFormat) -> ExportResult<PathBuf> {
        let name = format.file_name(table);
        let mut components = Path::new(&name).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == name.as_str() => {
                Ok(self.out_dir.join(part))
            }
            _ => {
                warn!(table = %table, "Table name is not a plain file name");
                Err(ExportError::UnsafeFileName(table.to_string()))
            }
        }
    }
}

async fn build_dataset(conn: &mut SqliteConnection, table: &str) -> ExportResult<Dataset> {
    let tables = schema::list_tables(conn)
        .await
        .map_err(|e| ExportError::from_sqlx(table, e))?;

    if !tables.iter().any(|t| t == table) {
        warn!(table = %table, "Export of unknown table refused");
        return Err(ExportError::TableNotFound(table.to_string()));
    }

    let table_schema = schema::describe(conn, table).await?;

    let mut relations = Vec::with_capacity(table_schema.foreign_keys.len());
    for fk in &table_schema.foreign_keys {
        let target = schema::describe(conn, &fk.target_table).await?;
        relations.push(RelationColumns {
            target_table: target.name,
            target_columns: target.columns,
        });
    }

    let records = assembler::assemble(conn, &table_schema).await?;

    Ok(Dataset {
        table: table_schema.name,
        columns: table_schema.columns,
        relations,
        records,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
