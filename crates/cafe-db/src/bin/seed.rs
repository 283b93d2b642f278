//! # Seed Data Generator
//!
//! Bootstraps a café database and fills it with a sample menu and a few
//! orders, so every table has something to export.
//!
//! ## Usage
//! ```bash
//! # Seed ./cafe_dev.db (default)
//! cargo run -p cafe-db --bin seed
//!
//! # Specify database path
//! cargo run -p cafe-db --bin seed -- --db ./data/cafe.db
//!
//! # Menu only, no sample orders
//! cargo run -p cafe-db --bin seed -- --menu-only
//! ```

use std::env;

use cafe_core::OrderStatus;
use cafe_db::{Database, DbConfig};

/// Sample dishes: (title, price).
const MENU: &[(&str, i64)] = &[
    ("Espresso", 120),
    ("Americano", 140),
    ("Cappuccino", 180),
    ("Latte", 190),
    ("Black tea", 90),
    ("Green tea", 90),
    ("Hot chocolate", 170),
    ("Croissant", 150),
    ("Cheesecake", 260),
    ("Club sandwich", 340),
    ("Caesar salad", 390),
    ("Tomato soup", 280),
];

/// Sample orders: (table, [(dish index, quantity)], final status).
const ORDERS: &[(i64, &[(usize, i64)], OrderStatus)] = &[
    (2, &[(0, 2), (7, 2)], OrderStatus::Completed),
    (5, &[(2, 1), (8, 1), (4, 1)], OrderStatus::Completed),
    (7, &[(9, 2), (1, 2)], OrderStatus::Active),
    (9, &[(11, 1)], OrderStatus::Cancelled),
    (12, &[(3, 3), (6, 1), (8, 2)], OrderStatus::Active),
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cafe_dev.db");
    let mut menu_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--menu-only" => menu_only = true,
            "--help" | "-h" => {
                println!("Café POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cafe_dev.db)");
                println!("      --menu-only    Insert the menu but no sample orders");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Café POS Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, café tables present");

    let existing = db.menu().list().await?;
    if !existing.is_empty() {
        println!("⚠ Menu already has {} dishes", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut dish_ids = Vec::with_capacity(MENU.len());
    for (title, price) in MENU {
        let dish = db.menu().add(title, *price).await?;
        dish_ids.push(dish.id);
    }
    println!("✓ Added {} dishes", dish_ids.len());

    if !menu_only {
        for (table, lines, status) in ORDERS {
            let order = db.orders().create(*table).await?;
            for (dish, quantity) in lines.iter() {
                db.orders().add_item(order.id, dish_ids[*dish], *quantity).await?;
            }
            if *status != OrderStatus::Active {
                db.orders().set_status(order.id, *status).await?;
            }
        }
        println!("✓ Added {} sample orders", ORDERS.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
