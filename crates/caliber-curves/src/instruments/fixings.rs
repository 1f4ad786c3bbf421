//! Historical index fixings.

use std::collections::BTreeMap;

use caliber_core::Date;
use serde::{Deserialize, Serialize};

/// Fixings of one index, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixingSeries {
    fixings: BTreeMap<Date, f64>,
}

impl FixingSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the fixing on `date`.
    #[must_use]
    pub fn with_fixing(mut self, date: Date, rate: f64) -> Self {
        self.insert(date, rate);
        self
    }

    /// Adds (or replaces) the fixing on `date` in place.
    pub fn insert(&mut self, date: Date, rate: f64) {
        self.fixings.insert(date, rate);
    }

    /// The fixing on `date`, if any.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.fixings.get(&date).copied()
    }

    /// The series restricted to dates strictly before `date`.
    #[must_use]
    pub fn before(&self, date: Date) -> Self {
        Self {
            fixings: self.fixings.range(..date).map(|(d, r)| (*d, *r)).collect(),
        }
    }

    /// Number of fixings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixings.len()
    }

    /// True if the series holds no fixing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }
}

impl FromIterator<(Date, f64)> for FixingSeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self {
            fixings: iter.into_iter().collect(),
        }
    }
}

/// Fixing series keyed by index name.
///
/// # Example
///
/// ```rust
/// use caliber_core::Date;
/// use caliber_curves::instruments::{FixingSeries, FixingStore};
///
/// let today = Date::from_ymd(2011, 9, 28).unwrap();
/// let store = FixingStore::new()
///     .with_series("USDLIBOR3M", FixingSeries::new().with_fixing(today, 0.0036));
/// assert_eq!(store.fixing("USDLIBOR3M", today), Some(0.0036));
/// assert_eq!(store.fixing("USDLIBOR6M", today), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixingStore {
    series: BTreeMap<String, FixingSeries>,
}

impl FixingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the series of an index.
    #[must_use]
    pub fn with_series(mut self, index: impl Into<String>, series: FixingSeries) -> Self {
        self.series.insert(index.into(), series);
        self
    }

    /// The series of an index, if any.
    #[must_use]
    pub fn series(&self, index: &str) -> Option<&FixingSeries> {
        self.series.get(index)
    }

    /// The fixing of `index` on `date`, if any.
    #[must_use]
    pub fn fixing(&self, index: &str, date: Date) -> Option<f64> {
        self.series.get(index).and_then(|s| s.get(date))
    }
}
