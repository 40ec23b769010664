#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database connection, schema, and registry queries for ResiTrack.
//!
//! Uses `switchy_database` over a `SQLite` (rusqlite) backend with raw
//! parameterized SQL via `query_raw_params()` / `exec_raw_params()`. Every
//! operation is an independent statement (or a check-then-write pair on a
//! single row); there are no multi-entity transactions because no operation
//! ever touches more than one entity.

pub mod db;
pub mod households;
pub mod incidents;
pub mod metrics;

use switchy_database::Database;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// No row exists for the requested id.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("household" or "incident").
        entity: &'static str,
        /// The id that was requested.
        id: String,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Creates the registry tables if they do not exist yet.
///
/// Ids are UUIDs assigned on insert; insertion order is preserved through
/// the implicit `SQLite` rowid, which the list queries order by.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails.
pub async fn create_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS households (
            id TEXT NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            contact TEXT,
            special_needs TEXT,
            status TEXT NOT NULL DEFAULT 'unverified',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS incidents (
            id TEXT NOT NULL PRIMARY KEY,
            kind TEXT NOT NULL,
            phase TEXT NOT NULL,
            severity TEXT NOT NULL,
            description TEXT NOT NULL,
            affected_area TEXT NOT NULL,
            affected_families INTEGER NOT NULL DEFAULT 0,
            relief_distributed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS status_history (
            household_id TEXT NOT NULL,
            previous_status TEXT NOT NULL,
            new_status TEXT NOT NULL,
            changed_at TEXT NOT NULL
        )",
    )
    .await?;

    log::info!("Registry schema ready");
    Ok(())
}

/// Current time as an RFC 3339 UTC string, the format every timestamp
/// column stores.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
