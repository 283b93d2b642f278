//! # cafe-pos
//!
//! ## Usage
//! ```bash
//! # Interactive role menus
//! cafe-pos
//!
//! # One-shot commands
//! cafe-pos tables
//! cafe-pos --out ./exports export orders menu
//! cafe-pos export            # every table
//! cafe-pos --db ./cafe.db report
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use cafe_db::{Database, DbConfig};
use cafe_pos::{commands, init_tracing, AppConfig, AppResult, Console, Session};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "cafe-pos", version, about = "Café point-of-sale console")]
struct Cli {
    /// SQLite database file (overrides CAFE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Export directory (overrides CAFE_OUTPUT_DIR)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tables with their columns and relations
    Tables,
    /// Export tables as JSON, CSV, XML and text
    Export {
        /// Tables to export (all when omitted)
        tables: Vec<String>,
    },
    /// Print the sales report
    Report,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("Error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::from_env()?.with_overrides(cli.db, cli.out);
    config.ensure_database_dir()?;
    info!(
        db = %config.database_path.display(),
        out = %config.output_dir.display(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Some(Command::Tables) => commands::tables(&db, &mut out).await,
        Some(Command::Export { tables }) => commands::export(&db, &config, &tables, &mut out).await,
        Some(Command::Report) => commands::report(&db, &config, &mut out).await,
        None => {
            let console = Console::new(io::stdin().lock(), &mut out);
            Session::new(db.clone(), config, console).run().await
        }
    };

    out.flush()?;
    db.close().await;
    result
}
