//! Flat curve.

use super::Curve;

/// A curve with one flat zero rate, which is its only parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCurve {
    rate: f64,
}

impl ConstantCurve {
    /// Creates a flat curve.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// The flat rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Curve for ConstantCurve {
    fn zero_rate(&self, _t: f64) -> f64 {
        self.rate
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn parameter_sensitivity(&self, _t: f64) -> Vec<f64> {
        vec![1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_curve() {
        let curve = ConstantCurve::new(0.03);
        assert_eq!(curve.zero_rate(7.0), 0.03);
        assert_eq!(curve.parameter_sensitivity(0.1), vec![1.0]);
        assert_eq!(curve.discount_factor(0.0), 1.0);
    }
}
