//! The known curve set.
//!
//! A [`CurveProvider`] maps curve names to concrete curves together with
//! their currency, plus the FX matrix shared as seed data. It only ever
//! grows: [`CurveProvider::with_curve`] returns a new provider and the
//! curves themselves are shared behind `Arc`, so a provider handed to a
//! later calibration step can never be altered by it.

use std::collections::HashMap;
use std::sync::Arc;

use caliber_core::{Currency, FxMatrix};

use crate::curves::{Curve, YieldCurve};
use crate::error::{CurveError, CurveResult};

#[derive(Debug, Clone, PartialEq)]
struct CurveEntry {
    curve: Arc<YieldCurve>,
    currency: Currency,
}

/// Named curves with their currencies and the FX matrix.
///
/// # Example
///
/// ```rust
/// use caliber_core::{Currency, FxMatrix};
/// use caliber_curves::curves::ConstantCurve;
/// use caliber_curves::provider::CurveProvider;
///
/// let provider = CurveProvider::new(FxMatrix::new(Currency::USD))
///     .with_curve("USD Dsc", ConstantCurve::new(0.01).into(), Currency::USD)
///     .unwrap();
/// let df = provider.discount_factor("USD Dsc", 1.0).unwrap();
/// assert!((df - (-0.01f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveProvider {
    names: Vec<String>,
    entries: HashMap<String, CurveEntry>,
    fx: FxMatrix,
}

impl CurveProvider {
    /// Creates an empty provider around an FX matrix.
    #[must_use]
    pub fn new(fx: FxMatrix) -> Self {
        Self {
            names: Vec::new(),
            entries: HashMap::new(),
            fx,
        }
    }

    /// Returns a provider that also holds `curve` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCurve` if the name is already taken.
    pub fn with_curve(
        self,
        name: impl Into<String>,
        curve: YieldCurve,
        currency: Currency,
    ) -> CurveResult<Self> {
        self.with_shared_curve(name, Arc::new(curve), currency)
    }

    /// Like [`with_curve`](Self::with_curve) for an already shared curve.
    pub fn with_shared_curve(
        mut self,
        name: impl Into<String>,
        curve: Arc<YieldCurve>,
        currency: Currency,
    ) -> CurveResult<Self> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CurveError::DuplicateCurve { name });
        }
        self.entries
            .insert(name.clone(), CurveEntry { curve, currency });
        self.names.push(name);
        Ok(self)
    }

    /// Returns the curve called `name`.
    pub fn curve(&self, name: &str) -> CurveResult<&YieldCurve> {
        self.entry(name).map(|e| e.curve.as_ref())
    }

    /// Returns a shared handle to the curve called `name`.
    pub fn curve_arc(&self, name: &str) -> CurveResult<Arc<YieldCurve>> {
        self.entry(name).map(|e| Arc::clone(&e.curve))
    }

    /// Returns the currency of the curve called `name`.
    pub fn currency_of(&self, name: &str) -> CurveResult<Currency> {
        self.entry(name).map(|e| e.currency)
    }

    /// True if a curve called `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Curve names in insertion order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no curve is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Discount factor of the curve called `name` at time `t`.
    pub fn discount_factor(&self, name: &str, t: f64) -> CurveResult<f64> {
        Ok(self.curve(name)?.discount_factor(t))
    }

    /// Simply compounded forward rate of the curve called `name`.
    pub fn forward_rate(&self, name: &str, start: f64, end: f64, accrual: f64) -> CurveResult<f64> {
        Ok(self.curve(name)?.forward_rate(start, end, accrual))
    }

    /// The FX matrix.
    #[must_use]
    pub fn fx_matrix(&self) -> &FxMatrix {
        &self.fx
    }

    /// True if every curve of `other` is present here, as the same curve.
    #[must_use]
    pub fn is_superset_of(&self, other: &CurveProvider) -> bool {
        other.names.iter().all(|name| {
            match (self.entries.get(name), other.entries.get(name)) {
                (Some(mine), Some(theirs)) => {
                    Arc::ptr_eq(&mine.curve, &theirs.curve) || mine == theirs
                }
                _ => false,
            }
        })
    }

    fn entry(&self, name: &str) -> CurveResult<&CurveEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| CurveError::unknown_curve(name))
    }
}
