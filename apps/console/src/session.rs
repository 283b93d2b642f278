//! # Interactive Session
//!
//! Role selection, then the chosen role's action menu until log-out.
//!
//! ## Flow
//! ```text
//!   ┌────────────┐  1-4   ┌──────────────────┐  n   ┌───────────────┐
//!   │  Sign in   │───────►│  Role menu       │─────►│  perform()    │
//!   │  (roles)   │◄───────│  (role.actions)  │◄─────│  print/error  │
//!   └─────┬──────┘ log out└──────────────────┘      └───────────────┘
//!         │ 5 / end of input
//!         ▼
//!       exit
//! ```
//!
//! A failed action prints its message and returns to the same menu. Running
//! out of input ends the session from anywhere.

use std::io::{BufRead, Write};

use cafe_core::validation::validate_table_number;
use cafe_core::{Action, Order, OrderDetails, OrderStatus, Role, TableState};
use cafe_db::Database;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::prompt::Console;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    LogOut,
    Quit,
}

/// One operator session over a console.
pub struct Session<R, W> {
    db: Database,
    config: AppConfig,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(db: Database, config: AppConfig, console: Console<R, W>) -> Self {
        Session {
            db,
            config,
            console,
        }
    }

    /// Ends the session, returning the console.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs the sign-in loop until the operator exits or input ends.
    pub async fn run(&mut self) -> AppResult<()> {
        let exit = Role::ALL.len() + 1;

        loop {
            self.console.say("\nSign in")?;
            self.console.say("Choose your role:")?;
            for (i, role) in Role::ALL.iter().enumerate() {
                self.console.say(format!("{}. {}", i + 1, role.title()))?;
            }
            self.console.say(format!("{}. Exit", exit))?;

            let Some(choice) = self.console.ask("Your choice: ")? else {
                break;
            };

            match choice.parse::<usize>() {
                Ok(n) if n == exit => {
                    self.console.say("Exiting...")?;
                    break;
                }
                Ok(n) if (1..exit).contains(&n) => {
                    if self.role_menu(Role::ALL[n - 1]).await? == Flow::Quit {
                        break;
                    }
                }
                _ => {
                    self.console
                        .say(format!("Invalid choice! Enter a number from 1 to {}.", exit))?;
                }
            }
        }

        info!("Session ended");
        Ok(())
    }

    async fn role_menu(&mut self, role: Role) -> AppResult<Flow> {
        info!(role = ?role, "Signed in");
        let actions = role.actions();
        let log_out = actions.len() + 1;

        loop {
            self.console
                .say(format!("\n=== {} MENU ===", role.title().to_uppercase()))?;
            for (i, action) in actions.iter().enumerate() {
                self.console.say(format!("{}. {}", i + 1, action.label()))?;
            }
            self.console.say(format!("{}. Log out", log_out))?;

            let Some(choice) = self.console.ask("Choose an action: ")? else {
                return Ok(Flow::Quit);
            };

            let action = match choice.parse::<usize>() {
                Ok(n) if n == log_out => return Ok(Flow::LogOut),
                Ok(n) if (1..log_out).contains(&n) => actions[n - 1],
                _ => {
                    self.console.say("Invalid choice!")?;
                    continue;
                }
            };

            match self.perform(action).await {
                Ok(()) => {}
                Err(e) if e.is_input_closed() => return Ok(Flow::Quit),
                Err(e) => {
                    warn!(action = ?action, code = ?e.code, "Action failed");
                    self.console.say(format!("Error: {}", e.message))?;
                }
            }
        }
    }

    /// Performs one menu action.
    pub async fn perform(&mut self, action: Action) -> AppResult<()> {
        debug!(action = ?action, "Performing action");

        match action {
            Action::ShowMenu => self.show_menu().await,
            Action::AddDish => self.add_dish().await,
            Action::DeleteDish => self.delete_dish().await,
            Action::CreateOrder => self.create_order().await,
            Action::AddDishToOrder => self.add_dish_to_order().await,
            Action::RemoveDishFromOrder => self.remove_dish_from_order().await,
            Action::ShowActiveOrders => self.show_active_orders().await,
            Action::ChangeOrderStatus => self.change_order_status().await,
            Action::ShowTables => self.show_tables().await,
            Action::ChangeTableStatus => self.change_table_status().await,
            Action::ViewReports => self.view_reports().await,
            Action::ExportTable => self.export_table().await,
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    async fn show_menu(&mut self) -> AppResult<()> {
        let items = self.db.menu().list().await?;
        self.console.print(&render::menu(&items, &self.config))?;
        Ok(())
    }

    async fn add_dish(&mut self) -> AppResult<()> {
        let title = self.console.ask_text("Dish title: ")?;
        let price: i64 = self.console.ask_parsed("Price: ", "Price")?;

        let item = self.db.menu().add(&title, price).await?;
        self.console
            .say(format!("Dish '{}' added to the menu (ID {})", item.title, item.id))?;
        Ok(())
    }

    async fn delete_dish(&mut self) -> AppResult<()> {
        self.show_menu().await?;
        let id: i64 = self.console.ask_parsed("\nDish ID to delete: ", "Dish ID")?;

        let removed = self.db.menu().delete(id).await?;
        self.console
            .say(format!("Dish '{}' removed from the menu", removed.title))?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn create_order(&mut self) -> AppResult<()> {
        let table: i64 = self.console.ask_parsed("\nTable number: ", "Table number")?;

        let order = self.db.orders().create(table).await?;
        self.console.say(format!(
            "Order #{} for table {} created",
            order.id, order.table_number
        ))?;
        self.console
            .say(format!("Table #{} is now {}", table, TableState::Occupied.label()))?;

        self.fill_order(order).await
    }

    /// Lets the operator add dishes to a fresh order until an empty line.
    async fn fill_order(&mut self, order: Order) -> AppResult<()> {
        self.show_menu().await?;

        loop {
            let lines = self.db.orders().lines(order.id).await?;
            self.console
                .say(format!("\n=== ADDING DISHES TO ORDER #{} ===", order.id))?;
            if lines.is_empty() {
                self.console.say("No items on the order yet")?;
            } else {
                let details = OrderDetails {
                    order: order.clone(),
                    lines,
                };
                self.console
                    .print(&render::order_lines(&details, &self.config))?;
            }

            let dish = self.console.ask_text("Dish ID (empty to finish): ")?;
            if dish.is_empty() {
                return Ok(());
            }

            match self.add_line(order.id, &dish).await {
                Ok(()) => {}
                Err(e) if e.is_input_closed() => return Err(e),
                Err(e) => self.console.say(format!("Error: {}", e.message))?,
            }
        }
    }

    async fn add_line(&mut self, order_id: i64, dish: &str) -> AppResult<()> {
        let menu_id: i64 = dish
            .parse()
            .map_err(|_| AppError::invalid_input("Dish ID must be a number"))?;
        let quantity: i64 = self.console.ask_parsed("Quantity: ", "Quantity")?;

        self.db.orders().add_item(order_id, menu_id, quantity).await?;
        self.console.say("Dish added to the order")?;
        Ok(())
    }

    async fn add_dish_to_order(&mut self) -> AppResult<()> {
        let order_id: i64 = self.console.ask_parsed("\nOrder ID: ", "Order ID")?;
        let menu_id: i64 = self.console.ask_parsed("Dish ID: ", "Dish ID")?;
        let quantity: i64 = self.console.ask_parsed("Quantity: ", "Quantity")?;

        self.db.orders().add_item(order_id, menu_id, quantity).await?;
        self.console
            .say(format!("Dish {} added to order #{}", menu_id, order_id))?;
        Ok(())
    }

    async fn remove_dish_from_order(&mut self) -> AppResult<()> {
        let order_id: i64 = self.console.ask_parsed("\nOrder ID: ", "Order ID")?;
        let menu_id: i64 = self.console.ask_parsed("Dish ID to remove: ", "Dish ID")?;

        let removed = self.db.orders().remove_item(order_id, menu_id).await?;
        self.console.say(format!(
            "Dish {} removed from order #{} ({} line(s))",
            menu_id, order_id, removed
        ))?;
        Ok(())
    }

    async fn show_active_orders(&mut self) -> AppResult<()> {
        let orders = self.db.orders().active().await?;
        self.console
            .print(&render::active_orders(&orders, &self.config))?;
        Ok(())
    }

    async fn change_order_status(&mut self) -> AppResult<()> {
        let order_id: i64 = self.console.ask_parsed("\nOrder ID: ", "Order ID")?;

        self.console.say("\nAvailable statuses:")?;
        for (i, status) in OrderStatus::ALL.iter().enumerate() {
            self.console.say(format!("{}. {}", i + 1, status))?;
        }
        let status = self
            .console
            .choose("Choose a status (1-3): ", &OrderStatus::ALL)?;

        let order = self.db.orders().set_status(order_id, status).await?;
        if status.releases_table() {
            self.console
                .say(format!("Table #{} is free again", order.table_number))?;
        }
        self.console
            .say(format!("Order #{} is now '{}'", order.id, order.status))?;
        Ok(())
    }

    // =========================================================================
    // Tables
    // =========================================================================

    async fn show_tables(&mut self) -> AppResult<()> {
        let tables = self.db.tables().list().await?;
        self.console.print(&render::tables(&tables))?;
        Ok(())
    }

    async fn change_table_status(&mut self) -> AppResult<()> {
        let table: i64 = self.console.ask_parsed("\nTable number: ", "Table number")?;
        validate_table_number(table)?;

        self.console.say("\nAvailable statuses:")?;
        for (i, state) in TableState::ALL.iter().enumerate() {
            self.console
                .say(format!("{}. {} - {}", i + 1, state.as_str(), state.label()))?;
        }
        let state = self
            .console
            .choose("Choose a status (1-3): ", &TableState::ALL)?;

        self.db.tables().set_status(table, state).await?;
        self.console
            .say(format!("Table #{} is now '{}'", table, state.label()))?;
        Ok(())
    }

    // =========================================================================
    // Reports & Export
    // =========================================================================

    async fn view_reports(&mut self) -> AppResult<()> {
        let report = self.db.reports().sales_report().await?;
        self.console.print(&render::report(&report, &self.config))?;
        Ok(())
    }

    async fn export_table(&mut self) -> AppResult<()> {
        let tables = self.db.schema().list_tables().await?;
        if tables.is_empty() {
            self.console.say("No tables to export.")?;
            return Ok(());
        }

        self.console.say("\n=== DATA EXPORT ===")?;
        self.console.say("Available tables:")?;
        for (i, table) in tables.iter().enumerate() {
            self.console.say(format!("{}. {}", i + 1, table))?;
        }

        let index = self
            .console
            .choose_index("\nTable number to export: ", tables.len())?;
        let table = &tables[index];

        self.console.say(format!("\nExporting table: {}", table))?;
        let schema = self.db.schema().describe(table).await?;
        self.console.print(&render::schema(&schema))?;

        let outcome = self
            .db
            .exporter(&self.config.output_dir)
            .export(table)
            .await?;
        self.console
            .print(&render::export_outcome(&outcome, &self.config))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
