//! # Café POS Console
//!
//! Role-based console for the café: staff pick a role, then work through
//! that role's menu. Administrators and the owner can export any table.
//!
//! ## Module Organization
//! ```text
//! cafe_pos/
//! ├── lib.rs       ◄─── You are here (tracing setup)
//! ├── config.rs    ◄─── Environment + defaults
//! ├── error.rs     ◄─── AppError shown to the operator
//! ├── prompt.rs    ◄─── Line prompts over any reader/writer
//! ├── render.rs    ◄─── Plain-text screens
//! ├── session.rs   ◄─── Sign-in and role menus
//! └── commands.rs  ◄─── One-shot subcommands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod prompt;
pub mod render;
pub mod session;

use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, ConfigError};
pub use error::{AppError, AppResult, ErrorCode};
pub use prompt::Console;
pub use session::Session;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,cafe=info,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so menus on stdout stay readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cafe=trace` - Show trace for café crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
