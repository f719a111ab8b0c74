//! Opening and sharing the SQLite database
//!
//! Repositories, the audit sink and the outbox publisher share one
//! connection behind a mutex; see [`SharedConnection`].

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::errors::{from_rusqlite, io_error, Result};
use crate::migrations::apply_migrations;
use crate::repo::SharedConnection;

pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with the pragmas the schema relies on
pub fn configure(conn: &Connection) -> Result<()> {
    // Relations cascade on contract deletion
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    // journal_mode returns a row, so it cannot go through execute()
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Open (creating parent directories), configure and migrate a database
/// ready to be shared between repositories
pub fn open_shared<P: AsRef<Path>>(path: P) -> Result<SharedConnection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
    }

    let mut conn = open(path)?;
    configure(&conn)?;
    let applied = apply_migrations(&mut conn)?;
    if !applied.is_empty() {
        tracing::info!(path = %path.display(), migrations = ?applied, "database schema upgraded");
    }
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory equivalent of [`open_shared`]
pub fn open_shared_in_memory() -> Result<SharedConnection> {
    let mut conn = open_in_memory()?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;
    apply_migrations(&mut conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}
