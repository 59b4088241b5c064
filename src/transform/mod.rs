//! Transform step of the job
//!
//! - [`BankColumns`]: drop the rank column, keep name and USD market cap
//! - [`CurrencyConverter`]: add GBP, EUR and INR market caps
//! - [`BanksTransformer`]: both of the above over a whole table, with
//!   progress logging

mod columns;
mod currency;

pub use columns::{BankColumns, MIN_COLUMNS, RENAMED_COLUMNS, parse_market_cap};
pub use currency::{CurrencyConverter, TARGET_CURRENCIES, round2};

use crate::error::{Result, TransformError};
use crate::etl::Transformer;
use crate::model::{EnrichedBank, ExchangeRates, RawTable};
use crate::progress::ProgressLog;

/// Enrich a scraped banks table with converted market caps.
///
/// Row order and count are preserved. Rates are resolved and the table shape
/// is checked before any row is touched.
///
/// # Example
/// ```
/// use banks_etl::model::{ExchangeRates, RawTable};
/// use banks_etl::transform::enrich;
///
/// let banks = RawTable::new(
///     vec!["Rank".into(), "Bank".into(), "Cap".into()],
///     vec![vec!["1".into(), "Bank A".into(), "100.0".into()]],
/// );
/// let rates: ExchangeRates = [("GBP", 0.8), ("EUR", 0.93), ("INR", 82.1)].into_iter().collect();
///
/// let enriched = enrich(banks, &rates).unwrap();
/// assert_eq!(enriched[0].mc_eur_billion, 93.0);
/// ```
pub fn enrich(banks: RawTable, rates: &ExchangeRates) -> Result<Vec<EnrichedBank>> {
    let converter = CurrencyConverter::from_rates(rates)?;

    let width = banks.width();
    if width < MIN_COLUMNS {
        return Err(TransformError::Shape {
            expected: MIN_COLUMNS,
            found: width,
        }
        .into());
    }

    if let [_, name, market_cap, ..] = banks.headers.as_slice() {
        log::debug!(
            "Renaming columns '{}' -> {}, '{}' -> {}",
            name,
            RENAMED_COLUMNS[0],
            market_cap,
            RENAMED_COLUMNS[1]
        );
    }

    let selected = BankColumns.transform_many(banks.rows)?;
    converter.transform_many(selected)
}

/// Transform step: `(banks, rates)` in, enriched table out
pub struct BanksTransformer {
    progress: ProgressLog,
}

impl BanksTransformer {
    pub fn new(progress: ProgressLog) -> Self {
        Self { progress }
    }
}

impl Transformer for BanksTransformer {
    type Input = (RawTable, ExchangeRates);
    type Output = Vec<EnrichedBank>;

    fn transform(&self, (banks, rates): Self::Input) -> Result<Self::Output> {
        let result = enrich(banks, &rates);

        match &result {
            Ok(enriched) => {
                log::info!("Transformed {} bank(s)", enriched.len());
                self.progress.log("Data Transformation successful");
            }
            Err(e) => self
                .progress
                .log(&format!("Data transformation failed: {}", e)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use tempfile::TempDir;

    fn banks() -> RawTable {
        RawTable::new(
            vec![
                "Rank".to_string(),
                "Bank name".to_string(),
                "Market cap (US$ billion)".to_string(),
            ],
            vec![
                vec!["1".to_string(), "Bank A".to_string(), "100.0".to_string()],
                vec!["2".to_string(), "Bank B".to_string(), "50.0".to_string()],
            ],
        )
    }

    fn rates() -> ExchangeRates {
        [("GBP", 0.8), ("EUR", 0.93), ("INR", 82.1)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_enrich_two_banks() {
        let enriched = enrich(banks(), &rates()).unwrap();

        assert_eq!(
            enriched,
            vec![
                EnrichedBank {
                    name: "Bank A".to_string(),
                    mc_usd_billion: 100.0,
                    mc_gbp_billion: 80.0,
                    mc_eur_billion: 93.0,
                    mc_inr_billion: 8210.0,
                },
                EnrichedBank {
                    name: "Bank B".to_string(),
                    mc_usd_billion: 50.0,
                    mc_gbp_billion: 40.0,
                    mc_eur_billion: 46.5,
                    mc_inr_billion: 4105.0,
                },
            ]
        );
    }

    #[test]
    fn test_row_count_and_rounding_hold() {
        let caps = ["432.92", "231.52", "0.005", "1,000.333", "7.777"];
        let rows = caps
            .iter()
            .enumerate()
            .map(|(i, cap)| vec![(i + 1).to_string(), format!("Bank {}", i), cap.to_string()])
            .collect::<Vec<_>>();
        let rates = rates();

        let enriched = enrich(RawTable::new(vec![], rows), &rates).unwrap();

        assert_eq!(enriched.len(), caps.len());
        for (bank, cap) in enriched.iter().zip(caps) {
            let usd = parse_market_cap(cap).unwrap();
            assert_eq!(bank.mc_usd_billion, usd);
            assert_eq!(bank.mc_gbp_billion, round2(usd * 0.8));
            assert_eq!(bank.mc_eur_billion, round2(usd * 0.93));
            assert_eq!(bank.mc_inr_billion, round2(usd * 82.1));
        }
    }

    #[test]
    fn test_missing_inr_fails() {
        let rates: ExchangeRates = [("GBP", 0.8), ("EUR", 0.93)].into_iter().collect();
        let err = enrich(banks(), &rates).unwrap_err();
        assert!(matches!(
            err,
            EtlError::Transform(TransformError::MissingRate(ref c)) if c == "INR"
        ));
    }

    #[test]
    fn test_narrow_table_fails_fast() {
        let narrow = RawTable::new(
            vec!["Bank".to_string(), "Cap".to_string()],
            vec![vec!["Bank A".to_string(), "100.0".to_string()]],
        );
        let err = enrich(narrow, &rates()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::Transform(TransformError::Shape {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_empty_table_with_header() {
        let empty = RawTable::new(banks().headers, vec![]);
        assert!(enrich(empty, &rates()).unwrap().is_empty());
    }

    #[test]
    fn test_transformer_logs_progress() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("code_log.txt");
        let transformer = BanksTransformer::new(ProgressLog::new(&log_path));

        transformer.transform((banks(), rates())).unwrap();
        let bad_rates: ExchangeRates = [("GBP", 0.8)].into_iter().collect();
        transformer.transform((banks(), bad_rates)).unwrap_err();

        let log = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert!(lines[0].ends_with(": Data Transformation successful"));
        assert!(lines[1].ends_with(": Data transformation failed: no exchange rate for currency EUR"));
    }
}
