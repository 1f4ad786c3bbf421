//! Placement of curve parameters in the calibration parameter vector.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Where one curve's parameters sit in the parameter vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Curve name.
    pub name: String,
    /// Index of the first parameter.
    pub start: usize,
    /// Number of parameters.
    pub length: usize,
}

/// Curve name to `(start, length)` mapping over a parameter vector.
///
/// Entries are contiguous, do not overlap and cover `0..total_length`
/// exactly; every constructor checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveBuildingBlock {
    entries: Vec<LayoutEntry>,
    total_length: usize,
}

impl CurveBuildingBlock {
    /// Lays curves out back to back in the given order.
    pub fn from_lengths<I, S>(lengths: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut start = 0;
        let entries = lengths
            .into_iter()
            .map(|(name, length)| {
                let entry = LayoutEntry {
                    name: name.into(),
                    start,
                    length,
                };
                start += length;
                entry
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Validates explicit entries.
    ///
    /// # Errors
    ///
    /// `Configuration` on a repeated name, an empty curve, a gap or an
    /// overlap.
    pub fn from_entries(mut entries: Vec<LayoutEntry>) -> CurveResult<Self> {
        entries.sort_by_key(|e| e.start);
        let mut next = 0;
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(CurveError::configuration(format!(
                    "curve {} appears twice in the parameter layout",
                    entry.name
                )));
            }
            if entry.length == 0 {
                return Err(CurveError::configuration(format!(
                    "curve {} has no parameters",
                    entry.name
                )));
            }
            if entry.start != next {
                return Err(CurveError::configuration(format!(
                    "curve {} starts at {} but the previous curve ends at {next}",
                    entry.name, entry.start
                )));
            }
            next += entry.length;
        }
        Ok(Self {
            entries,
            total_length: next,
        })
    }

    /// The layout followed by more curves.
    pub fn extended<I, S>(&self, lengths: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let existing = self.entries.iter().map(|e| (e.name.clone(), e.length));
        let added = lengths.into_iter().map(|(n, l)| (n.into(), l));
        Self::from_lengths(existing.chain(added))
    }

    /// Entries in parameter order.
    #[must_use]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Total number of parameters.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Curve names in parameter order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// True if the curve is laid out.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// The entry of a curve.
    pub fn entry(&self, name: &str) -> CurveResult<&LayoutEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| CurveError::unknown_curve(name))
    }

    /// First parameter index of a curve.
    pub fn start(&self, name: &str) -> CurveResult<usize> {
        self.entry(name).map(|e| e.start)
    }

    /// Parameter count of a curve.
    pub fn length(&self, name: &str) -> CurveResult<usize> {
        self.entry(name).map(|e| e.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lengths() {
        let layout =
            CurveBuildingBlock::from_lengths([("USD Dsc", 13), ("USD Fwd 3M", 8)]).unwrap();
        assert_eq!(layout.total_length(), 21);
        assert_eq!(layout.start("USD Fwd 3M").unwrap(), 13);
        assert_eq!(layout.length("USD Dsc").unwrap(), 13);
        assert!(layout.start("USD Fwd 6M").is_err());

        let extended = layout.extended([("USD Fwd 6M", 4)]).unwrap();
        assert_eq!(extended.total_length(), 25);
        assert_eq!(
            extended.names().collect::<Vec<_>>(),
            vec!["USD Dsc", "USD Fwd 3M", "USD Fwd 6M"]
        );
    }

    #[test]
    fn test_invalid_layouts() {
        let entry = |name: &str, start, length| LayoutEntry {
            name: name.to_string(),
            start,
            length,
        };
        // gap
        let gap = vec![entry("a", 0, 2), entry("b", 3, 1)];
        assert!(CurveBuildingBlock::from_entries(gap).is_err());
        // overlap
        let overlap = vec![entry("a", 0, 2), entry("b", 1, 1)];
        assert!(CurveBuildingBlock::from_entries(overlap).is_err());
        // duplicate
        assert!(CurveBuildingBlock::from_lengths([("a", 1), ("a", 1)]).is_err());
        // empty
        assert!(CurveBuildingBlock::from_lengths([("a", 0)]).is_err());
        // out of order entries are fine once sorted
        let layout =
            CurveBuildingBlock::from_entries(vec![entry("b", 2, 1), entry("a", 0, 2)]).unwrap();
        assert_eq!(layout.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
