//! Core types shared across PeopleDB facilities
//!
//! This crate provides the foundational vocabulary used by both the error
//! facility and the logging facility:
//!
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
