//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::errors::{orm_from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path, creating parent directories
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            peopledb_core::StoreError::new(format!(
                "cannot create directory {}: {}",
                parent.display(),
                e
            ))
            .with_op("open")
        })?;
    }
    let conn = Connection::open(path).map_err(|e| orm_from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| orm_from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Enable foreign keys and, for file databases, WAL journaling
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| orm_from_rusqlite("configure", e))?;

    // In-memory databases stay in "memory" mode and report it back
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| orm_from_rusqlite("configure", e))?;
    tracing::debug!(journal_mode = %mode, "configured connection");

    Ok(())
}
