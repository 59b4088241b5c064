//! Exchange-rate CSV extractor

use crate::client::SourceClient;
use crate::config::DataSource;
use crate::error::{ExtractionError, Result};
use crate::etl::Extractor;
use crate::model::ExchangeRates;
use csv::{ReaderBuilder, Trim};

/// Header of the column holding the rate values
pub const RATE_COLUMN: &str = "Rate";

/// Extractor for the exchange-rate table
///
/// Expects a header row; the first column is the currency code and the
/// `Rate` column holds the value.
pub struct ExchangeRateExtractor {
    client: SourceClient,
    source: DataSource,
}

impl ExchangeRateExtractor {
    pub fn new(client: SourceClient, source: DataSource) -> Self {
        Self { client, source }
    }
}

impl Extractor for ExchangeRateExtractor {
    type Output = ExchangeRates;

    async fn extract(&self) -> Result<Self::Output> {
        log::debug!("Fetching exchange rates from {}", self.source);
        let body = self.client.fetch_text(&self.source).await?;

        let rates = parse_rates(&body)?;
        log::info!(
            "Extracted {} exchange rate(s): {}",
            rates.len(),
            rates.currencies().collect::<Vec<_>>().join(", ")
        );
        Ok(rates)
    }
}

/// Parse exchange-rate CSV text
pub fn parse_rates(text: &str) -> std::result::Result<ExchangeRates, ExtractionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let rate_index = headers
        .iter()
        .position(|h| h == RATE_COLUMN)
        .filter(|&i| i > 0)
        .ok_or_else(|| ExtractionError::MissingColumn(RATE_COLUMN.to_string()))?;

    let mut rates = ExchangeRates::new();
    for record in reader.records() {
        let record = record?;
        let currency = record.get(0).unwrap_or_default();
        if currency.is_empty() {
            log::debug!("Skipping exchange-rate row without a currency code");
            continue;
        }

        let value = record.get(rate_index).unwrap_or_default();
        let rate = value
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| ExtractionError::InvalidRate {
                currency: currency.to_string(),
                value: value.to_string(),
            })?;

        rates.insert(currency, rate)?;
    }

    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates() {
        let rates = parse_rates("Currency,Rate\nEUR,0.93\nGBP,0.8\nINR,82.95\n").unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates.rate("EUR").unwrap(), 0.93);
        assert_eq!(rates.rate("GBP").unwrap(), 0.8);
        assert_eq!(rates.rate("INR").unwrap(), 82.95);
    }

    #[test]
    fn test_rate_column_found_by_name() {
        let rates = parse_rates("Code, Country , Rate\n GBP ,UK, 0.8\n").unwrap();
        assert_eq!(rates.rate("GBP").unwrap(), 0.8);
    }

    #[test]
    fn test_missing_rate_column() {
        let err = parse_rates("Currency,Value\nGBP,0.8\n").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingColumn(ref c) if c == "Rate"));
    }

    #[test]
    fn test_invalid_rate() {
        let err = parse_rates("Currency,Rate\nGBP,n/a\n").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidRate { ref currency, ref value } if currency == "GBP" && value == "n/a"
        ));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = parse_rates("Currency,Rate\nGBP,0.8,extra\n").unwrap_err();
        assert!(matches!(err, ExtractionError::Csv(_)));
    }

    #[test]
    fn test_duplicate_currency() {
        let err = parse_rates("Currency,Rate\nGBP,0.8\nGBP,0.81\n").unwrap_err();
        assert!(matches!(err, ExtractionError::DuplicateCurrency(ref c) if c == "GBP"));
    }
}
