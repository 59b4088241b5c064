//! Embedded database output of the enriched banks table

use crate::error::{EtlError, Result};
use crate::etl::Loader;
use crate::model::EnrichedBank;
use crate::progress::ProgressLog;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

/// Load the enriched table into a SQLite database file.
///
/// Every load replaces the table: it is dropped, recreated and filled inside
/// one transaction, so a failed load leaves the previous contents in place.
/// The connection is opened per load and closed when the load returns.
pub struct SqliteLoader {
    db_path: PathBuf,
    table_name: String,
    progress: ProgressLog,
}

impl SqliteLoader {
    /// Create a new loader
    ///
    /// # Arguments
    /// * `db_path` - Database file, created if absent
    /// * `table_name` - Table to replace on each load
    /// * `progress` - Progress log for the outcome of each load
    pub fn new(db_path: impl AsRef<Path>, table_name: &str, progress: ProgressLog) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            table_name: table_name.to_string(),
            progress,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Replace the table contents with `items`
    pub fn replace(&self, items: &[EnrichedBank]) -> Result<usize> {
        self.replace_inner(items).map_err(|source| EtlError::Storage {
            path: self.db_path.clone(),
            table: self.table_name.clone(),
            source,
        })
    }

    fn replace_inner(&self, items: &[EnrichedBank]) -> rusqlite::Result<usize> {
        let mut conn = Connection::open(&self.db_path)?;
        let table = quote_identifier(&self.table_name);
        let tx = conn.transaction()?;

        log::debug!("Recreating table {} in {}", table, self.db_path.display());
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 Name TEXT,
                 MC_USD_Billion REAL,
                 MC_GBP_Billion REAL,
                 MC_EUR_Billion REAL,
                 MC_INR_Billion REAL
             );"
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} (Name, MC_USD_Billion, MC_GBP_Billion, MC_EUR_Billion, MC_INR_Billion)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;
            for bank in items {
                stmt.execute(params![
                    bank.name,
                    bank.mc_usd_billion,
                    bank.mc_gbp_billion,
                    bank.mc_eur_billion,
                    bank.mc_inr_billion,
                ])?;
            }
        }

        tx.commit()?;
        Ok(items.len())
    }
}

impl Loader for SqliteLoader {
    type Item = EnrichedBank;

    async fn load(&self, items: &[Self::Item]) -> Result<usize> {
        match self.replace(items) {
            Ok(count) => {
                log::info!(
                    "Loaded {} row(s) into {}:{}",
                    count,
                    self.db_path.display(),
                    self.table_name
                );
                self.progress.log("Data loaded to database");
                Ok(count)
            }
            Err(e) => {
                self.progress.log(&format!("Database load failed: {}", e));
                Err(e)
            }
        }
    }
}

/// Double-quote an identifier for use in SQL text
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
