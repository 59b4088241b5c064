//! Extractors for the two source tables
//!
//! - [`BanksPageExtractor`]: the banks table scraped from an HTML document
//! - [`ExchangeRateExtractor`]: currency rates from a CSV resource
//! - [`SourceExtractor`]: both of the above, as one extraction step

mod banks;
mod rates;

pub use banks::{BanksPageExtractor, parse_tables, select_table};
pub use rates::{ExchangeRateExtractor, RATE_COLUMN, parse_rates};

use crate::client::SourceClient;
use crate::config::EtlConfig;
use crate::error::{EtlError, Result};
use crate::etl::Extractor;
use crate::model::{ExchangeRates, RawTable};
use crate::progress::ProgressLog;

/// Extraction step of the job: fetches the banks table, then the rates.
///
/// A single attempt is made for each source; the outcome is recorded in the
/// progress log and any failure is passed on unchanged.
pub struct SourceExtractor {
    banks: BanksPageExtractor,
    rates: ExchangeRateExtractor,
    progress: ProgressLog,
}

impl SourceExtractor {
    pub fn new(config: &EtlConfig, client: SourceClient, progress: ProgressLog) -> Self {
        Self {
            banks: BanksPageExtractor::new(
                client.clone(),
                config.banks_source.clone(),
                config.table_index,
            ),
            rates: ExchangeRateExtractor::new(client, config.rates_source.clone()),
            progress,
        }
    }
}

impl Extractor for SourceExtractor {
    type Output = (RawTable, ExchangeRates);

    async fn extract(&self) -> Result<Self::Output> {
        let result = async {
            let banks = self.banks.extract().await?;
            let rates = self.rates.extract().await?;
            Ok::<_, EtlError>((banks, rates))
        }
        .await;

        match &result {
            Ok(_) => self.progress.log("Data Extraction successful"),
            Err(e) => self.progress.log(&format!("Data extraction failed: {}", e)),
        }
        result
    }
}
