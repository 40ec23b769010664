//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

/// Default on-disk location of the registry database.
pub const DEFAULT_DB_PATH: &str = "data/resitrack.db";

/// Opens the registry `SQLite` database at `path`, creating the parent
/// directory if needed. `None` opens an in-memory database (used by tests).
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the connection
/// fails.
pub fn open(path: Option<&Path>) -> Result<Box<dyn Database>, Box<dyn std::error::Error>> {
    if let Some(parent) = path.and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = init_sqlite_rusqlite(path)?;
    Ok(db)
}

/// Opens the registry database at the path named by the `RESITRACK_DB_PATH`
/// environment variable, falling back to [`DEFAULT_DB_PATH`].
///
/// # Errors
///
/// Returns an error if the connection fails.
pub fn open_from_env() -> Result<Box<dyn Database>, Box<dyn std::error::Error>> {
    let path = std::env::var("RESITRACK_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    open(Some(Path::new(&path)))
}
