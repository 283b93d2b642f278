//! Plain-text screens shared by the role menus and the subcommands.

use std::str::FromStr;

use cafe_core::{MenuItem, OrderDetails, SalesReport, TableState, TableStatus};
use cafe_db::{ExportOutcome, TableSchema};

use crate::config::AppConfig;

/// The café menu as a table.
pub fn menu(items: &[MenuItem], config: &AppConfig) -> String {
    let mut out = String::from("\n=== CAFÉ MENU ===\n");
    if items.is_empty() {
        out.push_str("The menu is empty.\n");
        return out;
    }

    out.push_str("ID | Title                | Price\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    for item in items {
        out.push_str(&format!("{:<2} | {:<20} | {}\n", item.id, item.title, config.price(item.price)));
    }
    out
}

/// Table numbers with their status and last change.
pub fn tables(tables: &[TableStatus]) -> String {
    let mut out = String::from("\n=== TABLE STATUSES ===\n");
    out.push_str("Table  | Status      | Last updated\n");
    out.push_str(&"-".repeat(50));
    out.push('\n');
    for table in tables {
        let updated = table
            .last_updated
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<6} | {:<11} | {}\n",
            table.table_number,
            table.status.label(),
            updated
        ));
    }
    out
}

/// Active orders with their lines and totals.
pub fn active_orders(orders: &[OrderDetails], config: &AppConfig) -> String {
    if orders.is_empty() {
        return "\nNo active orders.\n".to_string();
    }

    let mut out = String::from("\n=== ACTIVE ORDERS ===\n");
    for details in orders {
        let order = &details.order;
        let time = order
            .order_time
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "\nOrder #{} | Table: {} | Time: {} | Status: {}\n",
            order.id, order.table_number, time, order.status
        ));
        out.push_str(&order_lines(details, config));
    }
    out
}

/// Lines of one order followed by its total.
pub fn order_lines(details: &OrderDetails, config: &AppConfig) -> String {
    let mut out = String::new();
    if details.lines.is_empty() {
        out.push_str("  (no items)\n");
    }
    for line in &details.lines {
        out.push_str(&format!(
            "  - {} x{} = {}\n",
            line.title,
            line.quantity,
            config.price(line.line_total())
        ));
    }
    out.push_str(&format!("  TOTAL: {}\n", config.price(details.total())));
    out
}

/// Owner's report.
pub fn report(report: &SalesReport, config: &AppConfig) -> String {
    let mut out = String::from("\n=== REPORTS ===\n");
    out.push_str(&format!("Total revenue: {}\n", config.price(report.total_revenue)));
    out.push_str(&format!("Completed orders: {}\n", report.completed_orders));
    out.push_str(&format!("Active orders: {}\n", report.active_orders));

    out.push_str("\nTables by status:\n");
    for entry in &report.tables_by_status {
        // Unknown statuses are printed raw
        let label = TableState::from_str(&entry.status)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|_| entry.status.clone());
        out.push_str(&format!("- {}: {} tables\n", label, entry.count));
    }

    out.push_str("\nMost popular dishes:\n");
    if report.popular_dishes.is_empty() {
        out.push_str("  (no orders yet)\n");
    }
    for (rank, dish) in report.popular_dishes.iter().enumerate() {
        out.push_str(&format!("{}. {} - {} servings\n", rank + 1, dish.title, dish.quantity));
    }
    out
}

/// Columns and foreign keys of a table.
pub fn schema(schema: &TableSchema) -> String {
    let mut out = String::new();
    out.push_str(&format!("Columns: {}\n", schema.columns.join(", ")));
    if !schema.foreign_keys.is_empty() {
        out.push_str("Relations:\n");
        for fk in &schema.foreign_keys {
            out.push_str(&format!(
                "  - {} -> {}.{}\n",
                fk.source_column, fk.target_table, fk.target_column
            ));
        }
    }
    out
}

/// Record count and written files of an export.
pub fn export_outcome(outcome: &ExportOutcome, config: &AppConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nExported records: {}\n", outcome.records));
    out.push_str(&format!("Files written to {}/:\n", config.output_dir.display()));
    for artifact in &outcome.artifacts {
        let name = artifact
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| artifact.path.display().to_string());
        out.push_str(&format!("   - {}\n", name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::{Order, OrderLine, OrderStatus, PopularDish, TableStatusCount};
    use cafe_db::ForeignKey;
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            database_path: PathBuf::from("cafe.db"),
            output_dir: PathBuf::from("out"),
            currency: "руб.".to_string(),
        }
    }

    #[test]
    fn test_menu() {
        let items = vec![MenuItem {
            id: 1,
            title: "Tea".to_string(),
            price: 100,
        }];

        let text = menu(&items, &config());

        assert!(text.contains("1  | Tea                  | 100 руб.\n"));
        assert!(menu(&[], &config()).contains("The menu is empty."));
    }

    #[test]
    fn test_order_lines_and_total() {
        let details = OrderDetails {
            order: Order {
                id: 3,
                table_number: 7,
                order_time: None,
                status: OrderStatus::Active,
            },
            lines: vec![OrderLine {
                menu_id: 1,
                title: "Tea".to_string(),
                price: 100,
                quantity: 2,
            }],
        };

        let text = active_orders(&[details], &config());

        assert!(text.contains("Order #3 | Table: 7 | Time: - | Status: active"));
        assert!(text.contains("  - Tea x2 = 200 руб.\n  TOTAL: 200 руб.\n"));
        assert_eq!(active_orders(&[], &config()), "\nNo active orders.\n");
    }

    #[test]
    fn test_report_labels_statuses() {
        let sales = SalesReport {
            total_revenue: 350,
            completed_orders: 1,
            active_orders: 0,
            tables_by_status: vec![
                TableStatusCount {
                    status: "free".to_string(),
                    count: 19,
                },
                TableStatusCount {
                    status: "broken".to_string(),
                    count: 1,
                },
            ],
            popular_dishes: vec![PopularDish {
                title: "Coffee".to_string(),
                quantity: 5,
            }],
        };

        let text = report(&sales, &config());

        assert!(text.contains("Total revenue: 350 руб."));
        assert!(text.contains("- Free: 19 tables"));
        assert!(text.contains("- broken: 1 tables"));
        assert!(text.contains("1. Coffee - 5 servings"));
    }

    #[test]
    fn test_schema_lists_relations() {
        let described = TableSchema {
            name: "orders".to_string(),
            columns: vec!["id".to_string(), "table_number".to_string()],
            foreign_keys: vec![ForeignKey {
                source_column: "table_number".to_string(),
                target_table: "table_status".to_string(),
                target_column: "table_number".to_string(),
            }],
        };

        assert_eq!(
            schema(&described),
            "Columns: id, table_number\nRelations:\n  - table_number -> table_status.table_number\n"
        );
    }
}
