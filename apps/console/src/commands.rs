//! Non-interactive subcommands: `tables`, `export`, `report`.

use std::io::Write;

use cafe_core::validation::validate_table_name;
use cafe_db::Database;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::render;

/// Prints every user table with its columns and relations.
pub async fn tables(db: &Database, out: &mut impl Write) -> AppResult<()> {
    for table in db.schema().list_tables().await? {
        let schema = db.schema().describe(&table).await?;
        writeln!(out, "{}", table)?;
        write!(out, "{}", render::schema(&schema))?;
    }
    Ok(())
}

/// Exports the named tables, or every user table when none are named.
///
/// Stops at the first failing table.
pub async fn export(
    db: &Database,
    config: &AppConfig,
    tables: &[String],
    out: &mut impl Write,
) -> AppResult<()> {
    let tables = if tables.is_empty() {
        db.schema().list_tables().await?
    } else {
        tables
            .iter()
            .map(|name| validate_table_name(name))
            .collect::<Result<Vec<_>, _>>()?
    };

    let exporter = db.exporter(&config.output_dir);
    for table in &tables {
        let outcome = exporter.export(table).await?;
        writeln!(out, "Table: {}", table)?;
        write!(out, "{}", render::export_outcome(&outcome, config))?;
    }

    info!(tables = tables.len(), out = %config.output_dir.display(), "Export finished");
    Ok(())
}

/// Prints the owner's report.
pub async fn report(db: &Database, config: &AppConfig, out: &mut impl Write) -> AppResult<()> {
    let report = db.reports().sales_report().await?;
    write!(out, "{}", render::report(&report, config))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cafe_db::DbConfig;
    use std::path::{Path, PathBuf};

    fn config(out_dir: &Path) -> AppConfig {
        AppConfig {
            database_path: PathBuf::from(":memory:"),
            output_dir: out_dir.to_path_buf(),
            currency: "руб.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_tables_lists_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut out = Vec::new();

        tables(&db, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("menu\nColumns: id, title, price\n"));
        assert!(text.contains("  - menu_id -> menu.id"));
    }

    #[tokio::test]
    async fn test_export_all_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        export(&db, &config(dir.path()), &[], &mut out).await.unwrap();

        // 4 café tables × 4 formats
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 16);
        assert!(String::from_utf8(out).unwrap().contains("Exported records: 20"));
    }

    #[tokio::test]
    async fn test_export_unknown_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = export(&db, &config(dir.path()), &["ghosts".to_string()], &mut Vec::new())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let err = export(&db, &config(dir.path()), &[" ".to_string()], &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_report() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut out = Vec::new();

        report(&db, &config(Path::new("out")), &mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Total revenue: 0 руб."));
    }
}
