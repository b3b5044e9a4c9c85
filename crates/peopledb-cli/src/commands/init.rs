//! Schema initialization command
//!
//! Usage: peopledb init [--db <PATH>]

use peopledb_store::{db, schema};
use std::path::Path;

/// Execute init command
pub fn execute(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open(db_path)?;
    schema::apply_schema(&conn)?;
    println!("Initialized {}", db_path.display());
    Ok(())
}
