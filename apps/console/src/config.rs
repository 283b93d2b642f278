//! Console configuration.
//!
//! Loaded from environment variables with fallback to defaults; command-line
//! flags override both.
//!
//! | Variable          | Default                                  |
//! |-------------------|------------------------------------------|
//! | `CAFE_DB_PATH`    | `<platform data dir>/cafe.db`            |
//! | `CAFE_OUTPUT_DIR` | `out`                                    |
//! | `CAFE_CURRENCY`   | `руб.`                                   |

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Serialize;

/// Default export directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Default currency suffix for prices.
pub const DEFAULT_CURRENCY: &str = "руб.";

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Directory receiving export artifacts
    pub output_dir: PathBuf,

    /// Suffix printed after prices
    pub currency: String,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        AppConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = match non_empty(&lookup, "CAFE_DB_PATH")? {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let output_dir = non_empty(&lookup, "CAFE_OUTPUT_DIR")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let currency = non_empty(&lookup, "CAFE_CURRENCY")?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(AppConfig {
            database_path,
            output_dir,
            currency,
        })
    }

    /// Applies `--db` / `--out` flags.
    pub fn with_overrides(mut self, database: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(path) = database {
            self.database_path = path;
        }
        if let Some(dir) = output {
            self.output_dir = dir;
        }
        self
    }

    /// Creates the directory holding the database file.
    pub fn ensure_database_dir(&self) -> Result<(), ConfigError> {
        match self.database_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    /// Formats a price with the configured currency.
    pub fn price(&self, amount: i64) -> String {
        format!("{} {}", amount, self.currency)
    }
}

/// Reads a variable, rejecting values that are set but blank.
fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(key.to_string())),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Platform-specific database location.
///
/// - **macOS**: `~/Library/Application Support/com.cafe.pos/cafe.db`
/// - **Windows**: `%APPDATA%\cafe\pos\data\cafe.db`
/// - **Linux**: `~/.local/share/pos/cafe.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "cafe", "pos").ok_or(ConfigError::NoDataDirectory)?;
    Ok(data_file(dirs.data_dir()))
}

fn data_file(dir: &Path) -> PathBuf {
    dir.join("cafe.db")
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine the application data directory; set CAFE_DB_PATH")]
    NoDataDirectory,

    #[error("Failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("CAFE_DB_PATH", "/tmp/cafe.db")])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/cafe.db"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.currency, "руб.");
        assert_eq!(config.price(150), "150 руб.");
    }

    #[test]
    fn test_environment_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CAFE_DB_PATH", "data/pos.db"),
            ("CAFE_OUTPUT_DIR", "exports"),
            ("CAFE_CURRENCY", "EUR"),
        ]))
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("exports"));
        assert_eq!(config.price(3), "3 EUR");
    }

    #[test]
    fn test_blank_value_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("CAFE_DB_PATH", "x.db"), ("CAFE_CURRENCY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "CAFE_CURRENCY"));
    }

    #[test]
    fn test_flags_override_environment() {
        let config = AppConfig::from_lookup(lookup(&[("CAFE_DB_PATH", "env.db")]))
            .unwrap()
            .with_overrides(Some(PathBuf::from("flag.db")), None);

        assert_eq!(config.database_path, PathBuf::from("flag.db"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_ensure_database_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_lookup(lookup(&[(
            "CAFE_DB_PATH",
            dir.path().join("nested/cafe.db").to_str().unwrap(),
        )]))
        .unwrap();

        config.ensure_database_dir().unwrap();

        assert!(dir.path().join("nested").is_dir());
        assert_eq!(data_file(Path::new("d")), PathBuf::from("d/cafe.db"));
    }
}
