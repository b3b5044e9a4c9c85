//! Canonical schema bootstrap
//!
//! A single idempotent script; there is no versioned migration history.

use crate::errors::{orm_from_rusqlite, Result};
use peopledb_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// PEOPLE and ADDRESSES tables
///
/// DOB holds UTC RFC 3339 text and SALARY decimal text; both are declared
/// TEXT so SQLite never coerces them to numbers.
pub const CANONICAL_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ADDRESSES (
    ID INTEGER PRIMARY KEY AUTOINCREMENT,
    STREET_ADDRESS TEXT NOT NULL,
    ADDRESS2 TEXT,
    CITY TEXT NOT NULL,
    STATE TEXT NOT NULL,
    POSTCODE TEXT NOT NULL,
    COUNTY TEXT,
    REGION TEXT NOT NULL,
    COUNTRY TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS PEOPLE (
    ID INTEGER PRIMARY KEY AUTOINCREMENT,
    FIRST_NAME TEXT NOT NULL,
    LAST_NAME TEXT NOT NULL,
    DOB TEXT NOT NULL,
    SALARY TEXT,
    EMAIL TEXT,
    HOME_ADDRESS INTEGER REFERENCES ADDRESSES(ID) ON DELETE SET NULL,
    BUSINESS_ADDRESS INTEGER REFERENCES ADDRESSES(ID) ON DELETE SET NULL,
    SPOUSE_ID INTEGER REFERENCES PEOPLE(ID) ON DELETE SET NULL,
    PARENT_ID INTEGER REFERENCES PEOPLE(ID) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS IDX_PEOPLE_PARENT_ID ON PEOPLE(PARENT_ID);
";

/// Apply the canonical schema; safe to run on an initialized database
pub fn apply_schema(conn: &Connection) -> Result<()> {
    log_op_start!("apply_schema");
    let start = Instant::now();

    conn.execute_batch(CANONICAL_SCHEMA)
        .map_err(|e| orm_from_rusqlite("apply_schema", e))
        .map_err(|e| {
            log_op_error!(
                "apply_schema",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "apply_schema",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(())
}
