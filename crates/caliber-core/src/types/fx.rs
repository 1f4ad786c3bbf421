//! FX matrix shared as seed data between calibration blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Currency;
use crate::error::{CoreError, CoreResult};

/// Spot FX rates expressed against a single base currency.
///
/// Each entry stores how many units of a currency one unit of the base buys.
/// Cross rates are derived through the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxMatrix {
    base: Currency,
    units_per_base: BTreeMap<Currency, f64>,
}

impl FxMatrix {
    /// Creates a matrix containing only the base currency.
    #[must_use]
    pub fn new(base: Currency) -> Self {
        let mut units_per_base = BTreeMap::new();
        units_per_base.insert(base, 1.0);
        Self {
            base,
            units_per_base,
        }
    }

    /// Adds a currency, quoted as units of `currency` per unit of the base.
    ///
    /// # Errors
    ///
    /// Returns an error when the rate is not strictly positive and finite.
    pub fn add_currency(mut self, currency: Currency, units_per_base: f64) -> CoreResult<Self> {
        if !(units_per_base.is_finite() && units_per_base > 0.0) {
            return Err(CoreError::invalid_input(format!(
                "FX rate for {currency} must be positive, got {units_per_base}"
            )));
        }
        if currency == self.base && (units_per_base - 1.0).abs() > f64::EPSILON {
            return Err(CoreError::invalid_input(format!(
                "base currency {currency} must have rate 1"
            )));
        }
        self.units_per_base.insert(currency, units_per_base);
        Ok(self)
    }

    /// Returns the base currency.
    #[must_use]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// True if the currency has a rate in the matrix.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.units_per_base.contains_key(&currency)
    }

    /// Currencies in the matrix.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.units_per_base.keys().copied()
    }

    /// Units of `to` obtained for one unit of `from`.
    pub fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64> {
        let missing = || CoreError::MissingFxRate {
            from: from.code().to_string(),
            to: to.code().to_string(),
        };
        let from_rate = self.units_per_base.get(&from).ok_or_else(missing)?;
        let to_rate = self.units_per_base.get(&to).ok_or_else(missing)?;
        Ok(to_rate / from_rate)
    }

    /// Converts an amount between currencies.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> CoreResult<f64> {
        if from == to {
            return Ok(amount);
        }
        Ok(amount * self.fx_rate(from, to)?)
    }
}

impl Default for FxMatrix {
    fn default() -> Self {
        Self::new(Currency::USD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix() -> FxMatrix {
        FxMatrix::new(Currency::USD)
            .add_currency(Currency::EUR, 0.8)
            .unwrap()
            .add_currency(Currency::JPY, 110.0)
            .unwrap()
    }

    #[test]
    fn test_direct_and_cross_rates() {
        let fx = matrix();
        assert_relative_eq!(fx.fx_rate(Currency::USD, Currency::EUR).unwrap(), 0.8);
        assert_relative_eq!(fx.fx_rate(Currency::EUR, Currency::USD).unwrap(), 1.25);
        assert_relative_eq!(fx.fx_rate(Currency::EUR, Currency::JPY).unwrap(), 137.5);
        assert_relative_eq!(
            fx.convert(100.0, Currency::EUR, Currency::USD).unwrap(),
            125.0
        );
    }

    #[test]
    fn test_missing_currency() {
        let fx = matrix();
        assert!(fx.fx_rate(Currency::GBP, Currency::USD).is_err());
        assert_relative_eq!(fx.convert(5.0, Currency::GBP, Currency::GBP).unwrap(), 5.0);
    }

    #[test]
    fn test_invalid_rates() {
        assert!(FxMatrix::new(Currency::USD).add_currency(Currency::EUR, 0.0).is_err());
        assert!(FxMatrix::new(Currency::USD).add_currency(Currency::USD, 2.0).is_err());
        assert!(FxMatrix::default().contains(Currency::USD));
    }
}
