//! Additive sensitivity accumulator keyed by curve and currency.

use std::collections::BTreeMap;

use caliber_core::{Currency, FxMatrix};
use nalgebra::DVector;

use crate::error::{CurveError, CurveResult};

/// Key of a sensitivity entry.
pub type SensitivityKey = (String, Currency);

/// Sensitivities to curve parameters (or market quotes), one vector per
/// curve and currency.
///
/// Entries under the same key always have the same length; merging vectors
/// of different lengths fails instead of misaligning them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSensitivity {
    entries: BTreeMap<SensitivityKey, DVector<f64>>,
}

impl ParameterSensitivity {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `vector` under `(name, currency)` in place.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if an entry of another length exists under the key.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        currency: Currency,
        vector: DVector<f64>,
    ) -> CurveResult<()> {
        let key = (name.into(), currency);
        match self.entries.get_mut(&key) {
            Some(existing) => {
                if existing.len() != vector.len() {
                    return Err(CurveError::length_mismatch(
                        format!("sensitivity to {} in {}", key.0, key.1),
                        existing.len(),
                        vector.len(),
                    ));
                }
                *existing += vector;
            }
            None => {
                self.entries.insert(key, vector);
            }
        }
        Ok(())
    }

    /// Returns the accumulator with `vector` added under `(name, currency)`.
    pub fn plus_entry(
        mut self,
        name: impl Into<String>,
        currency: Currency,
        vector: DVector<f64>,
    ) -> CurveResult<Self> {
        self.add_entry(name, currency, vector)?;
        Ok(self)
    }

    /// Entrywise sum of two accumulators.
    pub fn plus(self, other: ParameterSensitivity) -> CurveResult<Self> {
        other
            .entries
            .into_iter()
            .try_fold(self, |acc, ((name, currency), vector)| {
                acc.plus_entry(name, currency, vector)
            })
    }

    /// Every entry scaled by `factor`.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for vector in self.entries.values_mut() {
            *vector *= factor;
        }
        self
    }

    /// True if both have the same keys and every pair of vectors agrees
    /// elementwise within `tolerance`.
    #[must_use]
    pub fn compare(&self, other: &ParameterSensitivity, tolerance: f64) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, vector)| {
                other.entries.get(key).is_some_and(|theirs| {
                    theirs.len() == vector.len()
                        && vector
                            .iter()
                            .zip(theirs.iter())
                            .all(|(a, b)| (a - b).abs() <= tolerance)
                })
            })
    }

    /// The entry under `(name, currency)`.
    #[must_use]
    pub fn get(&self, name: &str, currency: Currency) -> Option<&DVector<f64>> {
        self.entries.get(&(name.to_string(), currency))
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &SensitivityKey> {
        self.entries.keys()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&SensitivityKey, &DVector<f64>)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every element of every entry.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.values().map(|v| v.sum()).sum()
    }

    /// All entries expressed in `currency`, entries of the same curve summed.
    pub fn converted(&self, fx: &FxMatrix, currency: Currency) -> CurveResult<Self> {
        let mut result = Self::new();
        for ((name, from), vector) in &self.entries {
            let rate = fx.fx_rate(*from, currency)?;
            result.add_entry(name.clone(), currency, vector * rate)?;
        }
        Ok(result)
    }
}
