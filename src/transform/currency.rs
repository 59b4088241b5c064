//! Currency conversion of market caps

use crate::error::{Result, TransformError};
use crate::etl::Transformer;
use crate::model::{Bank, EnrichedBank, ExchangeRates};

/// Currencies every bank is converted to, in column order
pub const TARGET_CURRENCIES: [&str; 3] = ["GBP", "EUR", "INR"];

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Transformer that adds GBP, EUR and INR market caps to a bank
///
/// All rates are looked up when the converter is built, so a missing rate
/// fails before any row is converted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrencyConverter {
    gbp: f64,
    eur: f64,
    inr: f64,
}

impl CurrencyConverter {
    /// # Errors
    /// Returns [`TransformError::MissingRate`] if any target currency is absent
    pub fn from_rates(rates: &ExchangeRates) -> std::result::Result<Self, TransformError> {
        let [gbp, eur, inr] = TARGET_CURRENCIES;
        Ok(Self {
            gbp: rates.rate(gbp)?,
            eur: rates.rate(eur)?,
            inr: rates.rate(inr)?,
        })
    }
}

impl Transformer for CurrencyConverter {
    type Input = Bank;
    type Output = EnrichedBank;

    fn transform(&self, bank: Self::Input) -> Result<Self::Output> {
        let usd = bank.market_cap_usd;
        Ok(EnrichedBank {
            name: bank.name,
            mc_usd_billion: usd,
            mc_gbp_billion: round2(usd * self.gbp),
            mc_eur_billion: round2(usd * self.eur),
            mc_inr_billion: round2(usd * self.inr),
        })
    }
}
