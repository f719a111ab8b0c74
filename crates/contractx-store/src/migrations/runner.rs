//! Migration runner
//!
//! Each pending migration runs in its own transaction together with its
//! `schema_version` row. Migrations already recorded are verified against
//! their stored checksum instead of being re-run.

#![allow(clippy::result_large_err)]

use rusqlite::{params, Connection, OptionalExtension};

use super::embedded::{Migration, MIGRATIONS};
use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};

const SCHEMA_VERSION_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

/// Bring the schema up to date; returns the ids applied by this call
///
/// # Errors
/// A failing migration, or a recorded checksum that no longer matches the
/// embedded SQL.
pub fn apply_migrations(conn: &mut Connection) -> Result<Vec<&'static str>> {
    conn.execute_batch(SCHEMA_VERSION_DDL)
        .map_err(from_rusqlite)?;

    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        if run_if_pending(conn, migration)? {
            applied.push(migration.id);
        }
    }
    Ok(applied)
}

/// Ids recorded in `schema_version`, oldest first
///
/// # Errors
/// `ERR_PERSISTENCE` if the table cannot be read.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn run_if_pending(conn: &mut Connection, migration: &Migration) -> Result<bool> {
    let checksum = migration.checksum();
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    match recorded {
        Some(recorded) if recorded == checksum => return Ok(false),
        Some(recorded) => return Err(checksum_mismatch(migration.id, &recorded, &checksum)),
        None => {}
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        params![migration.id, chrono::Utc::now().timestamp_millis(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id = migration.id, "applied migration");
    Ok(true)
}
