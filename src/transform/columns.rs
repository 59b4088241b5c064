//! Positional column selection for the scraped banks table
//!
//! The scraped table is assumed to be laid out as `rank, name, market cap, ...`.
//! Columns are picked by position, not by header text, so an upstream
//! layout change is caught only through the width check.

use crate::error::{Result, TransformError};
use crate::etl::Transformer;
use crate::model::Bank;

/// Minimum number of columns: rank, name, market cap
pub const MIN_COLUMNS: usize = 3;

/// Canonical names given to the two columns kept after the rank is dropped
pub const RENAMED_COLUMNS: [&str; 2] = ["Name", "MC_USD_Billion"];

/// Transformer that drops the leading rank column and types the next two
///
/// # Example
/// ```
/// use banks_etl::etl::Transformer;
/// use banks_etl::transform::BankColumns;
///
/// let row = vec!["1".to_string(), "JPMorgan Chase".to_string(), "432.92[1]".to_string()];
/// let bank = BankColumns.transform(row).unwrap();
/// assert_eq!(bank.name, "JPMorgan Chase");
/// assert_eq!(bank.market_cap_usd, 432.92);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BankColumns;

impl Transformer for BankColumns {
    type Input = Vec<String>;
    type Output = Bank;

    fn transform(&self, row: Self::Input) -> Result<Self::Output> {
        let [_rank, name, market_cap, ..] = row.as_slice() else {
            return Err(TransformError::RowTooShort {
                expected: MIN_COLUMNS,
                found: row.len(),
            }
            .into());
        };

        let market_cap_usd =
            parse_market_cap(market_cap).ok_or_else(|| TransformError::InvalidMarketCap {
                name: name.clone(),
                value: market_cap.clone(),
            })?;

        Ok(Bank::new(name.trim(), market_cap_usd))
    }
}

/// Parse a market cap cell, ignoring footnote markers, thousands separators
/// and whitespace
pub fn parse_market_cap(raw: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(raw.len());
    let mut in_note = false;

    for c in raw.chars() {
        match c {
            '[' => in_note = true,
            ']' => in_note = false,
            _ if in_note => {}
            ',' => {}
            c if c.is_whitespace() => {}
            c => cleaned.push(c),
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
