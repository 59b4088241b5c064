//! Error types for each stage of the ETL job
//!
//! Every component returns a tagged error so callers can branch on the kind
//! of failure without inspecting message strings.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching or parsing the two source tables
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document has {found} table(s), table index {index} requested")]
    TableNotFound { index: usize, found: usize },

    #[error("malformed exchange-rate CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("exchange-rate CSV is missing the '{0}' column")]
    MissingColumn(String),

    #[error("invalid rate '{value}' for currency {currency}")]
    InvalidRate { currency: String, value: String },

    #[error("currency {0} appears more than once in the exchange-rate CSV")]
    DuplicateCurrency(String),
}

/// Failures while reshaping the banks table or converting currencies
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("no exchange rate for currency {0}")]
    MissingRate(String),

    #[error("banks table has {found} column(s), expected at least {expected}")]
    Shape { expected: usize, found: usize },

    #[error("banks row has {found} cell(s), expected at least {expected}")]
    RowTooShort { expected: usize, found: usize },

    #[error("invalid market cap '{value}' for {name}")]
    InvalidMarketCap { name: String, value: String },
}

/// Umbrella error for the whole job
#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to load {table} into {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query `{statement}` failed: {source}")]
    Query {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_is_transparent() {
        let err: EtlError = TransformError::MissingRate("INR".to_string()).into();
        assert_eq!(err.to_string(), "no exchange rate for currency INR");
        assert!(matches!(
            err,
            EtlError::Transform(TransformError::MissingRate(ref c)) if c == "INR"
        ));
    }

    #[test]
    fn test_table_not_found_message() {
        let err: EtlError = ExtractionError::TableNotFound { index: 1, found: 1 }.into();
        assert_eq!(
            err.to_string(),
            "document has 1 table(s), table index 1 requested"
        );
    }
}
