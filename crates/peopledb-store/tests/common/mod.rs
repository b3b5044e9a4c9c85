use chrono::{DateTime, FixedOffset};
use peopledb_core::model::{Address, Person, Region};
use peopledb_store::{db, schema};
use rusqlite::Connection;

/// Fresh in-memory database with the canonical schema
#[allow(dead_code)]
pub fn setup_test_db() -> Connection {
    let conn = db::open_in_memory().unwrap();
    schema::apply_schema(&conn).unwrap();
    conn
}

#[allow(dead_code)]
pub fn dob(text: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(text).unwrap()
}

#[allow(dead_code)]
pub fn john_smith() -> Person {
    Person::new("John", "Smith", dob("1980-11-15T15:15:00-06:00"))
}

#[allow(dead_code)]
pub fn beale_street() -> Address {
    Address::new(
        "123 Beale St.",
        "Wala Wala",
        "WA",
        "90210",
        "United States",
        Region::West,
    )
    .with_address2("Apt. 1A")
    .with_county("Fulton County")
}

#[allow(dead_code)]
pub fn office() -> Address {
    Address::new(
        "1 Market Sq.",
        "Chicago",
        "IL",
        "60601",
        "United States",
        Region::Central,
    )
}

#[allow(dead_code)]
pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}
