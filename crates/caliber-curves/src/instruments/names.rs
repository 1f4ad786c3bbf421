//! Binding of currencies and indices to curve names.

use std::collections::BTreeMap;

use caliber_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Which named curve discounts each currency and projects each index.
///
/// Derivatives only carry curve names; the curves behind them may not exist
/// yet when the derivative is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveNameMap {
    discounting: BTreeMap<Currency, String>,
    forward: BTreeMap<String, String>,
}

impl CurveNameMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discounts `currency` on the curve `name`.
    #[must_use]
    pub fn with_discounting(mut self, currency: Currency, name: impl Into<String>) -> Self {
        self.discounting.insert(currency, name.into());
        self
    }

    /// Projects the index called `index` on the curve `name`.
    #[must_use]
    pub fn with_forward(mut self, index: impl Into<String>, name: impl Into<String>) -> Self {
        self.forward.insert(index.into(), name.into());
        self
    }

    /// The discounting curve name of a currency.
    pub fn discounting_curve(&self, currency: Currency) -> CurveResult<&str> {
        self.discounting
            .get(&currency)
            .map(String::as_str)
            .ok_or_else(|| {
                CurveError::configuration(format!("no discounting curve for {currency}"))
            })
    }

    /// The forward curve name of an index.
    pub fn forward_curve(&self, index: &str) -> CurveResult<&str> {
        self.forward
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CurveError::configuration(format!("no forward curve for {index}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let names = CurveNameMap::new()
            .with_discounting(Currency::USD, "USD Dsc")
            .with_forward("USDLIBOR3M", "USD Fwd 3M");
        assert_eq!(names.discounting_curve(Currency::USD).unwrap(), "USD Dsc");
        assert_eq!(names.forward_curve("USDLIBOR3M").unwrap(), "USD Fwd 3M");
        assert!(names.forward_curve("USDLIBOR6M").unwrap_err().is_configuration());
        assert!(names.discounting_curve(Currency::EUR).is_err());
    }
}
