//! Sensitivities to curve zero rates at points in time.

use std::collections::BTreeMap;

/// Two node times closer than this are merged by [`MulticurveSensitivity::cleaned`].
const TIME_TOLERANCE: f64 = 1e-12;

/// `dV / dr(t)` at points `t` of each named curve.
///
/// Points are kept as added; [`cleaned`](Self::cleaned) sorts and merges them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MulticurveSensitivity {
    sensitivities: BTreeMap<String, Vec<(f64, f64)>>,
}

impl MulticurveSensitivity {
    /// Creates an empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single point on one curve.
    #[must_use]
    pub fn from_point(curve: &str, time: f64, value: f64) -> Self {
        let mut sensitivity = Self::new();
        sensitivity.add_point(curve, time, value);
        sensitivity
    }

    /// Adds a point in place.
    pub fn add_point(&mut self, curve: &str, time: f64, value: f64) {
        self.sensitivities
            .entry(curve.to_string())
            .or_default()
            .push((time, value));
    }

    /// Concatenates the points of both sensitivities.
    #[must_use]
    pub fn plus(mut self, other: MulticurveSensitivity) -> Self {
        for (curve, points) in other.sensitivities {
            self.sensitivities.entry(curve).or_default().extend(points);
        }
        self
    }

    /// Scales every point.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for points in self.sensitivities.values_mut() {
            for point in points.iter_mut() {
                point.1 *= factor;
            }
        }
        self
    }

    /// Sorts points by time and merges points at the same time.
    #[must_use]
    pub fn cleaned(mut self) -> Self {
        for points in self.sensitivities.values_mut() {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut merged: Vec<(f64, f64)> = Vec::with_capacity(points.len());
            for &(time, value) in points.iter() {
                match merged.last_mut() {
                    Some(last) if (time - last.0).abs() < TIME_TOLERANCE => last.1 += value,
                    _ => merged.push((time, value)),
                }
            }
            *points = merged;
        }
        self
    }

    /// Curves with at least one point.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.sensitivities.keys().map(String::as_str)
    }

    /// Points of one curve.
    #[must_use]
    pub fn get(&self, curve: &str) -> Option<&[(f64, f64)]> {
        self.sensitivities.get(curve).map(Vec::as_slice)
    }

    /// Iterates over curves and their points.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(f64, f64)])> {
        self.sensitivities
            .iter()
            .map(|(name, points)| (name.as_str(), points.as_slice()))
    }

    /// True if there is no point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.values().all(Vec::is_empty)
    }
}
