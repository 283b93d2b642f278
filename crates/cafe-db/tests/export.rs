//! End-to-end export tests: a real SQLite database in, four files out.

use std::fs;
use std::path::Path;

use cafe_core::{ExportFormat, Field, Record, Value};
use cafe_db::{Database, DbConfig, ExportError};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

async fn cafe_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// In-memory database without the café tables.
async fn bare_db(ddl: &[&str]) -> Database {
    let db = Database::new(DbConfig::in_memory().bootstrap(false)).await.unwrap();
    for statement in ddl {
        sqlx::query(statement).execute(db.pool()).await.unwrap();
    }
    db
}

fn read(dir: &TempDir, file: &str) -> String {
    fs::read_to_string(dir.path().join(file)).unwrap()
}

fn json_records(dir: &TempDir, file: &str) -> Vec<Record> {
    serde_json::from_str(&read(dir, file)).unwrap()
}

fn csv_header(text: &str) -> Vec<&str> {
    text.lines().next().unwrap().split(',').collect()
}

fn file_count(path: &Path) -> usize {
    fs::read_dir(path).map(|entries| entries.count()).unwrap_or(0)
}

// =============================================================================
// Flat tables
// =============================================================================

#[tokio::test]
async fn test_menu_export_without_foreign_keys() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    db.menu().add("Coffee", 150).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let outcome = db.exporter(dir.path()).export("menu").await.unwrap();

    assert_eq!(outcome.table, "menu");
    assert_eq!(outcome.records, 2);
    assert_eq!(file_count(dir.path()), 4);

    let records = json_records(&dir, "menu.json");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["id", "title", "price"]);
    assert_eq!(records[0].get("title"), Some(&Field::from("Tea")));
    assert_eq!(records[1].get("price"), Some(&Field::from(150_i64)));

    assert_eq!(read(&dir, "menu.csv"), "id,title,price\n1,Tea,100\n2,Coffee,150\n");

    let xml = read(&dir, "menu.xml");
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains("<menu>"));
    assert_eq!(xml.matches("<record>").count(), 2);
    assert!(xml.contains("<title>Coffee</title>"));

    let text = read(&dir, "menu.txt");
    assert!(text.starts_with("Table: menu\n"));
    assert!(text.contains("Record #2:"));
    assert!(text.contains("  title: Coffee"));
}

#[tokio::test]
async fn test_zero_fk_records_equal_raw_rows() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let dataset = db.exporter(dir.path()).dataset("menu").await.unwrap();
    let item = db.menu().get(1).await.unwrap().unwrap();

    let expected: Record = [
        ("id", Value::from(item.id)),
        ("title", Value::from(item.title)),
        ("price", Value::from(item.price)),
    ]
    .into_iter()
    .collect();
    assert_eq!(dataset.records, vec![expected]);
    assert!(dataset.relations.is_empty());
}

// =============================================================================
// Relations
// =============================================================================

#[tokio::test]
async fn test_singular_relation_is_nested_and_prefixed() {
    let db = cafe_db().await;
    db.orders().create(3).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    db.exporter(dir.path()).export("orders").await.unwrap();

    let records = json_records(&dir, "orders.json");
    match records[0].get("table_status") {
        Some(Field::Nested(status)) => {
            assert_eq!(status.get("table_number"), Some(&Field::from(3_i64)));
            assert_eq!(status.get("status"), Some(&Field::from("occupied")));
        }
        other => panic!("expected nested table_status, got {other:?}"),
    }

    let csv = read(&dir, "orders.csv");
    assert_eq!(
        csv_header(&csv),
        vec![
            "id",
            "table_number",
            "order_time",
            "status",
            "table_status_table_number",
            "table_status_status",
            "table_status_last_updated",
        ]
    );
    assert!(!csv_header(&csv).contains(&"table_status"));
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row[1], "3");
    assert_eq!(row[5], "occupied");

    let xml = read(&dir, "orders.xml");
    assert!(xml.contains("<table_status>"));
    assert!(xml.contains("<status>occupied</status>"));
}

#[tokio::test]
async fn test_two_relations_keep_declaration_order() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let order = db.orders().create(1).await.unwrap();
    db.orders().add_item(order.id, 1, 2).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let dataset = db.exporter(dir.path()).dataset("order_items").await.unwrap();

    let targets: Vec<&str> = dataset.relations.iter().map(|r| r.target_table.as_str()).collect();
    assert_eq!(targets, vec!["orders", "menu"]);
    assert_eq!(
        dataset.records[0].keys().collect::<Vec<_>>(),
        vec!["id", "order_id", "menu_id", "quantity", "orders", "menu"]
    );
}

#[tokio::test]
async fn test_prefixed_column_never_overrides_base_column() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let order = db.orders().create(1).await.unwrap();
    db.orders().add_item(order.id, 1, 2).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    db.exporter(dir.path()).export("order_items").await.unwrap();

    // `menu` + `id` collides with the base column `menu_id`
    let csv = read(&dir, "order_items.csv");
    let header = csv_header(&csv);
    assert_eq!(header.iter().filter(|c| **c == "menu_id").count(), 1);
    assert_eq!(
        header,
        vec![
            "id",
            "order_id",
            "menu_id",
            "quantity",
            "orders_id",
            "orders_table_number",
            "orders_order_time",
            "orders_status",
            "menu_title",
            "menu_price",
        ]
    );
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row[2], "1");
    assert_eq!(row[8], "Tea");
    assert_eq!(row[9], "100");
}

const CATEGORY_DDL: &[&str] = &[
    "PRAGMA foreign_keys = OFF",
    "CREATE TABLE category (code TEXT, label TEXT)",
    "CREATE TABLE dish (id INTEGER PRIMARY KEY, name TEXT, category_code TEXT REFERENCES category(code))",
    "INSERT INTO category VALUES ('hot', 'Tea'), ('hot', 'Coffee'), ('cold', 'Lemonade')",
    "INSERT INTO dish VALUES (1, 'Special', 'hot'), (2, 'Iced', 'cold'), (3, 'Mystery', 'none'), (4, 'Plain', NULL)",
];

#[tokio::test]
async fn test_plural_relation_becomes_list() {
    let db = bare_db(CATEGORY_DDL).await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = db.exporter(dir.path()).export("dish").await.unwrap();
    assert_eq!(outcome.records, 4);

    let records = json_records(&dir, "dish.json");
    match records[0].get("category") {
        Some(Field::List(related)) => {
            assert_eq!(related.len(), 2);
            assert_eq!(related[0].get("label"), Some(&Field::from("Tea")));
            assert_eq!(related[1].get("label"), Some(&Field::from("Coffee")));
        }
        other => panic!("expected list, got {other:?}"),
    }
    assert!(matches!(records[1].get("category"), Some(Field::Nested(_))));
    assert!(!records[2].contains_key("category"));
    assert!(!records[3].contains_key("category"));

    let csv = read(&dir, "dish.csv");
    assert_eq!(
        csv,
        "id,name,category_code,category\n\
         1,Special,hot,\"{code: hot, label: Tea}; {code: hot, label: Coffee}\"\n\
         2,Iced,cold,\"{code: cold, label: Lemonade}\"\n\
         3,Mystery,none,\n\
         4,Plain,,\n"
    );

    let xml = read(&dir, "dish.xml");
    assert_eq!(xml.matches("<item>").count(), 2);
}

#[tokio::test]
async fn test_header_stable_when_rows_lack_relations() {
    let db = bare_db(&[
        "PRAGMA foreign_keys = OFF",
        "CREATE TABLE kind (id INTEGER PRIMARY KEY, label TEXT)",
        "CREATE TABLE thing (id INTEGER PRIMARY KEY, kind_id INTEGER REFERENCES kind(id))",
        "INSERT INTO kind VALUES (1, 'one')",
        "INSERT INTO thing VALUES (1, 1), (2, 99), (3, NULL)",
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();

    db.exporter(dir.path()).export("thing").await.unwrap();

    // `kind` + `id` folds into the base column `kind_id`
    assert_eq!(
        read(&dir, "thing.csv"),
        "id,kind_id,kind_label\n1,1,one\n2,99,\n3,,\n"
    );
}

// =============================================================================
// Empty and missing tables
// =============================================================================

#[tokio::test]
async fn test_empty_table_writes_four_empty_artifacts() {
    let db = cafe_db().await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = db.exporter(dir.path()).export("menu").await.unwrap();

    assert_eq!(outcome.records, 0);
    assert_eq!(outcome.artifacts.len(), 4);
    assert_eq!(read(&dir, "menu.json"), "[]");
    assert_eq!(read(&dir, "menu.csv"), "id,title,price\n");
    assert_eq!(
        read(&dir, "menu.xml"),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<menu>\n</menu>\n"
    );
    assert_eq!(read(&dir, "menu.txt"), format!("Table: menu\n{}\n\n", "=".repeat(50)));
}

#[tokio::test]
async fn test_empty_table_header_keeps_relation_columns() {
    let db = cafe_db().await;
    let dir = tempfile::tempdir().unwrap();

    db.exporter(dir.path()).export("orders").await.unwrap();

    assert_eq!(
        read(&dir, "orders.csv"),
        "id,table_number,order_time,status,\
         table_status_table_number,table_status_status,table_status_last_updated\n"
    );
}

#[tokio::test]
async fn test_missing_table_writes_nothing() {
    let db = cafe_db().await;
    let dir = tempfile::tempdir().unwrap();

    let err = db.exporter(dir.path()).export("ghosts").await.unwrap_err();

    assert!(matches!(err, ExportError::TableNotFound(ref t) if t == "ghosts"));
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_table_name_cannot_leave_output_dir() {
    let db = bare_db(&[
        r#"CREATE TABLE "../escaped" (id INTEGER)"#,
        r#"INSERT INTO "../escaped" (id) VALUES (1)"#,
        r#"CREATE TABLE "nested/name" (id INTEGER)"#,
    ])
    .await;
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");
    let exporter = db.exporter(&out);

    let err = exporter.export("../escaped").await.unwrap_err();
    assert!(matches!(err, ExportError::UnsafeFileName(ref t) if t == "../escaped"));

    let err = exporter.export("nested/name").await.unwrap_err();
    assert!(matches!(err, ExportError::UnsafeFileName(_)));

    assert!(!root.path().join("escaped.json").exists());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_dotted_table_name_stays_inside_output_dir() {
    let db = bare_db(&[r#"CREATE TABLE ".." (id INTEGER)"#]).await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = db.exporter(dir.path()).export("..").await.unwrap();

    assert_eq!(
        outcome.path(ExportFormat::Json),
        Some(dir.path().join("...json").as_path())
    );
    assert_eq!(file_count(dir.path()), 4);
}

#[tokio::test]
async fn test_internal_tables_are_not_exportable() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    // AUTOINCREMENT creates sqlite_sequence
    let err = db.exporter(dir.path()).export("sqlite_sequence").await.unwrap_err();

    assert!(matches!(err, ExportError::TableNotFound(_)));
}

// =============================================================================
// Repeated exports and round trips
// =============================================================================

#[tokio::test]
async fn test_repeated_export_overwrites() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let exporter = db.exporter(dir.path());

    exporter.export("menu").await.unwrap();
    db.menu().add("Coffee", 150).await.unwrap();
    exporter.export("menu").await.unwrap();

    assert_eq!(json_records(&dir, "menu.json").len(), 2);
    assert_eq!(file_count(dir.path()), 4);
}

#[tokio::test]
async fn test_json_round_trip_matches_dataset() {
    let db = cafe_db().await;
    db.menu().add("Tea", 100).await.unwrap();
    let order = db.orders().create(2).await.unwrap();
    db.orders().add_item(order.id, 1, 3).await.unwrap();
    db.orders().create(4).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let exporter = db.exporter(dir.path());

    exporter.export("orders").await.unwrap();
    let dataset = exporter.dataset("orders").await.unwrap();

    assert_eq!(json_records(&dir, "orders.json"), dataset.records);
}

#[tokio::test]
async fn test_real_values_read_the_same_in_every_format() {
    let db = bare_db(&[
        "CREATE TABLE price_list (id INTEGER PRIMARY KEY, price REAL)",
        "INSERT INTO price_list (id, price) VALUES (1, 100.0)",
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();

    db.exporter(dir.path()).export("price_list").await.unwrap();

    assert!(read(&dir, "price_list.json").contains("\"price\": 100.0"));
    assert!(read(&dir, "price_list.csv").contains("1,100.0\n"));
    assert!(read(&dir, "price_list.xml").contains("<price>100.0</price>"));
    assert!(read(&dir, "price_list.txt").contains("  price: 100.0\n"));
}

#[tokio::test]
async fn test_artifact_names_follow_table() {
    let db = cafe_db().await;
    let dir = tempfile::tempdir().unwrap();

    let outcome = db.exporter(dir.path()).export("table_status").await.unwrap();

    for format in ExportFormat::ALL {
        let path = outcome.path(format).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("table_status.{}", format.extension())
        );
    }
}
