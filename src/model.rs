//! In-memory tables passed between pipeline stages

use crate::error::{ExtractionError, TransformError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A table scraped from a document, cells kept as text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of columns, taken from the header row or the first data row
    pub fn width(&self) -> usize {
        if !self.headers.is_empty() {
            self.headers.len()
        } else {
            self.rows.first().map(Vec::len).unwrap_or(0)
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A bank after positional column selection
#[derive(Clone, Debug, PartialEq)]
pub struct Bank {
    pub name: String,
    pub market_cap_usd: f64,
}

impl Bank {
    pub fn new(name: impl Into<String>, market_cap_usd: f64) -> Self {
        Self {
            name: name.into(),
            market_cap_usd,
        }
    }
}

/// A bank with its market cap in every target currency.
///
/// Field order is the column order of the CSV file and the database table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBank {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "MC_USD_Billion")]
    pub mc_usd_billion: f64,

    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: f64,

    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: f64,

    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: f64,
}

impl EnrichedBank {
    pub const COLUMNS: [&'static str; 5] = [
        "Name",
        "MC_USD_Billion",
        "MC_GBP_Billion",
        "MC_EUR_Billion",
        "MC_INR_Billion",
    ];
}

/// Exchange rates keyed by currency code (e.g. "GBP")
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExchangeRates {
    rates: BTreeMap<String, f64>,
}

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate, rejecting a currency that is already present
    pub fn insert(&mut self, currency: impl Into<String>, rate: f64) -> Result<(), ExtractionError> {
        let currency = currency.into();
        if self.rates.contains_key(&currency) {
            return Err(ExtractionError::DuplicateCurrency(currency));
        }
        self.rates.insert(currency, rate);
        Ok(())
    }

    /// Exact-match lookup; a miss is fatal for the transform
    pub fn rate(&self, currency: &str) -> Result<f64, TransformError> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| TransformError::MissingRate(currency.to_string()))
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ExchangeRates {
    /// Later duplicates overwrite earlier ones; use [`ExchangeRates::insert`] to reject them
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_lookup_is_exact() {
        let rates: ExchangeRates = [("GBP", 0.8), ("EUR", 0.93)].into_iter().collect();
        assert_eq!(rates.rate("GBP").unwrap(), 0.8);
        assert!(matches!(
            rates.rate("gbp"),
            Err(TransformError::MissingRate(ref c)) if c == "gbp"
        ));
    }

    #[test]
    fn test_duplicate_currency_rejected() {
        let mut rates = ExchangeRates::new();
        rates.insert("EUR", 0.93).unwrap();
        let err = rates.insert("EUR", 0.95).unwrap_err();
        assert!(matches!(err, ExtractionError::DuplicateCurrency(ref c) if c == "EUR"));
        assert_eq!(rates.rate("EUR").unwrap(), 0.93);
    }

    #[test]
    fn test_raw_table_width() {
        let headed = RawTable::new(vec!["Rank".into(), "Bank".into()], vec![]);
        assert_eq!(headed.width(), 2);

        let headless = RawTable::new(vec![], vec![vec!["1".into(), "A".into(), "3".into()]]);
        assert_eq!(headless.width(), 3);
        assert_eq!(RawTable::default().width(), 0);
    }
}
