//! Curves composed of other curves.

use std::sync::Arc;

use super::{Curve, YieldCurve};

/// The sum of several curves; parameters are concatenated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SumCurve {
    components: Vec<YieldCurve>,
}

impl SumCurve {
    /// Creates a sum of curves.
    #[must_use]
    pub fn new(components: Vec<YieldCurve>) -> Self {
        Self { components }
    }

    /// The summed curves.
    #[must_use]
    pub fn components(&self) -> &[YieldCurve] {
        &self.components
    }
}

impl Curve for SumCurve {
    fn zero_rate(&self, t: f64) -> f64 {
        self.components.iter().map(|c| c.zero_rate(t)).sum()
    }

    fn parameter_count(&self) -> usize {
        self.components.iter().map(Curve::parameter_count).sum()
    }

    fn parameter_sensitivity(&self, t: f64) -> Vec<f64> {
        self.components
            .iter()
            .flat_map(|c| c.parameter_sensitivity(t))
            .collect()
    }
}

/// An existing named curve plus a spread curve.
///
/// Only the spread's parameters belong to this curve; the base curve is
/// shared with the curve set it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadCurve {
    base_name: String,
    base: Arc<YieldCurve>,
    spread: Box<YieldCurve>,
}

impl SpreadCurve {
    /// Adds `spread` on top of the curve `base` known as `base_name`.
    #[must_use]
    pub fn new(base_name: impl Into<String>, base: Arc<YieldCurve>, spread: YieldCurve) -> Self {
        Self {
            base_name: base_name.into(),
            base,
            spread: Box::new(spread),
        }
    }

    /// Name of the base curve.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The base curve.
    #[must_use]
    pub fn base(&self) -> &YieldCurve {
        &self.base
    }

    /// The spread curve.
    #[must_use]
    pub fn spread(&self) -> &YieldCurve {
        &self.spread
    }
}

impl Curve for SpreadCurve {
    fn zero_rate(&self, t: f64) -> f64 {
        self.base.zero_rate(t) + self.spread.zero_rate(t)
    }

    fn parameter_count(&self) -> usize {
        self.spread.parameter_count()
    }

    fn parameter_sensitivity(&self, t: f64) -> Vec<f64> {
        self.spread.parameter_sensitivity(t)
    }
}
