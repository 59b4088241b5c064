//! Banks ETL
//!
//! Extracts the largest banks by market capitalization and a table of
//! exchange rates, converts market caps to GBP, EUR and INR, and loads the
//! result into a CSV file and a SQLite table.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod etl;
pub mod model;
pub mod progress;
pub mod sources;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use client::SourceClient;
pub use config::{DataSource, EtlConfig};
pub use error::{EtlError, ExtractionError, Result, TransformError};
pub use etl::{Extractor, Loader, Pipeline, PipelineError, RunReport, Stage, Transformer};
pub use model::{Bank, EnrichedBank, ExchangeRates, RawTable};
pub use progress::ProgressLog;
pub use storage::{CsvReader, CsvWriter, QueryResult, QueryRunner, SqliteLoader};
