//! Persistence of the enriched table
//!
//! This module handles all output of the job:
//! - CSV file writing (and reading back)
//! - SQLite table replacement
//! - Verification queries against the database

mod csv_file;
mod query;
mod sqlite;

pub use csv_file::{CsvReader, CsvWriter};
pub use query::{QueryResult, QueryRunner};
pub use sqlite::{SqliteLoader, quote_identifier};
