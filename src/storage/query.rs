//! Ad-hoc SQL queries against the job's database

use crate::error::{EtlError, Result};
use crate::progress::ProgressLog;
use rusqlite::Connection;
use rusqlite::types::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Fully materialized result of one statement
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cell of the first row, for single-value queries like `AVG(...)`
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Values of one column by name
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => format!("{:?}", r),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl fmt::Display for QueryResult {
    /// Left-aligned text table with a header line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(format_value).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let render = |values: &[String]| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(value, &width)| format!("{:<width$}", value, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", render(self.columns.as_slice()))?;
        for row in &cells {
            writeln!(f, "{}", render(row.as_slice()))?;
        }
        Ok(())
    }
}

/// Runs literal SQL statements against a database file.
///
/// Statements are executed as given, without parameters, so only trusted
/// input may be passed. A connection is opened and closed per statement.
pub struct QueryRunner {
    db_path: PathBuf,
    progress: ProgressLog,
}

impl QueryRunner {
    pub fn new(db_path: impl AsRef<Path>, progress: ProgressLog) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            progress,
        }
    }

    /// Execute `statement` and buffer every resulting row
    ///
    /// # Errors
    /// Returns [`EtlError::Query`] on malformed SQL, a missing table, or I/O failure
    pub fn run_query(&self, statement: &str) -> Result<QueryResult> {
        log::debug!("Running query on {}: {}", self.db_path.display(), statement);

        let result = query(&self.db_path, statement).map_err(|source| EtlError::Query {
            statement: statement.to_string(),
            source,
        });

        match &result {
            Ok(rows) => {
                log::debug!("Query returned {} row(s)", rows.len());
                self.progress.log(&format!("Query executed: {}", statement));
            }
            Err(e) => self.progress.log(&format!("Query failed: {}", e)),
        }
        result
    }
}

fn query(db_path: &Path, statement: &str) -> rusqlite::Result<QueryResult> {
    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare(statement)?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(QueryResult { columns, rows })
}
