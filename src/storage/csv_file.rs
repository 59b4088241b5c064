//! Flat-file output of the enriched banks table

use crate::error::{EtlError, Result};
use crate::etl::Loader;
use crate::model::EnrichedBank;
use crate::progress::ProgressLog;
use std::path::{Path, PathBuf};

/// Write the enriched table as comma-separated values.
///
/// The file is replaced on every write: header row first, no index column.
pub struct CsvWriter {
    path: PathBuf,
    progress: ProgressLog,
}

impl CsvWriter {
    pub fn new(path: impl AsRef<Path>, progress: ProgressLog) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            progress,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all rows, overwriting any existing file
    pub fn write(&self, items: &[EnrichedBank]) -> Result<usize> {
        self.write_inner(items).map_err(|source| EtlError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(items.len())
    }

    fn write_inner(&self, items: &[EnrichedBank]) -> std::result::Result<(), csv::Error> {
        // Header written explicitly so an empty table still gets one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;

        writer.write_record(EnrichedBank::COLUMNS)?;
        for item in items {
            writer.serialize(item)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Loader for CsvWriter {
    type Item = EnrichedBank;

    async fn load(&self, items: &[Self::Item]) -> Result<usize> {
        match self.write(items) {
            Ok(count) => {
                log::info!("Wrote {} row(s) to {}", count, self.path.display());
                self.progress.log("Data saved to CSV");
                Ok(count)
            }
            Err(e) => {
                self.progress.log(&format!("CSV load failed: {}", e));
                Err(e)
            }
        }
    }
}

/// Read an enriched table back from a CSV file
pub struct CsvReader {
    path: PathBuf,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Column names in file order
    pub fn headers(&self) -> Result<Vec<String>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.error(e))?;
        let headers = reader.headers().map_err(|e| self.error(e))?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    pub fn read(&self) -> Result<Vec<EnrichedBank>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.error(e))?;
        reader
            .deserialize::<EnrichedBank>()
            .map(|row| row.map_err(|e| self.error(e)))
            .collect()
    }

    fn error(&self, source: csv::Error) -> EtlError {
        EtlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> Vec<EnrichedBank> {
        vec![
            EnrichedBank {
                name: "Bank A".to_string(),
                mc_usd_billion: 100.0,
                mc_gbp_billion: 80.0,
                mc_eur_billion: 93.0,
                mc_inr_billion: 8210.0,
            },
            EnrichedBank {
                name: "Bank, B".to_string(),
                mc_usd_billion: 50.0,
                mc_gbp_billion: 40.0,
                mc_eur_billion: 46.5,
                mc_inr_billion: 4105.0,
            },
        ]
    }

    #[test]
    fn test_write_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Largest_banks_data.csv");
        let writer = CsvWriter::new(&path, ProgressLog::new(temp_dir.path().join("log.txt")));

        assert_eq!(writer.write(&table()).unwrap(), 2);

        let reader = CsvReader::new(&path);
        assert_eq!(reader.headers().unwrap(), EnrichedBank::COLUMNS);
        assert_eq!(reader.read().unwrap(), table());
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        let writer = CsvWriter::new(&path, ProgressLog::new(temp_dir.path().join("log.txt")));
        writer.write(&table()[..1]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n\
             Bank A,100.0,80.0,93.0,8210.0\n"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        std::fs::write(&path, "stale content that is longer than the new file\n".repeat(50))
            .unwrap();

        let writer = CsvWriter::new(&path, ProgressLog::new(temp_dir.path().join("log.txt")));
        writer.write(&[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n"
        );
    }

    #[tokio::test]
    async fn test_load_failure_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");
        let path = temp_dir.path().join("missing-dir").join("out.csv");
        let writer = CsvWriter::new(&path, ProgressLog::new(&log_path));

        let err = writer.load(&table()).await.unwrap_err();
        assert!(matches!(err, EtlError::Io { .. }));

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains(": CSV load failed: failed to write"));
    }
}
