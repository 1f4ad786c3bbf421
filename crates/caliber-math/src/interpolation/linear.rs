//! Linear interpolation.

use super::{find_segment, validate_nodes, Interpolator};
use crate::error::MathResult;

/// Linear interpolation between data points with flat extrapolation.
///
/// # Example
///
/// ```rust
/// use caliber_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.01, 0.03]).unwrap();
/// assert!((interp.interpolate(1.5) - 0.02).abs() < 1e-15);
/// assert_eq!(interp.interpolate(5.0), 0.03);
/// assert_eq!(interp.node_sensitivity(1.25), vec![0.75, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, lengths differ, or the
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        Ok(Self { xs, ys })
    }

    /// Locates `x`: `Err(node)` when clamped to a boundary node,
    /// `Ok((i, t))` for weight `t` on node `i + 1`.
    fn locate(&self, x: f64) -> Result<(usize, f64), usize> {
        let last = self.xs.len() - 1;
        if x <= self.xs[0] {
            return Err(0);
        }
        if x >= self.xs[last] {
            return Err(last);
        }
        let i = find_segment(&self.xs, x);
        Ok((i, (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i])))
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> f64 {
        match self.locate(x) {
            Err(node) => self.ys[node],
            Ok((i, t)) => self.ys[i] + t * (self.ys[i + 1] - self.ys[i]),
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self.locate(x) {
            Err(_) => 0.0,
            Ok((i, _)) => (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]),
        }
    }

    fn node_sensitivity(&self, x: f64) -> Vec<f64> {
        let mut weights = vec![0.0; self.xs.len()];
        match self.locate(x) {
            Err(node) => weights[node] = 1.0,
            Ok((i, t)) => {
                weights[i] = 1.0 - t;
                weights[i + 1] = t;
            }
        }
        weights
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0])
            .unwrap();
        assert_relative_eq!(interp.interpolate(1.5), 2.5, epsilon = 1e-12);
        assert_relative_eq!(interp.derivative(1.5), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.02, 0.04]).unwrap();
        assert_eq!(interp.interpolate(0.0), 0.02);
        assert_eq!(interp.interpolate(10.0), 0.04);
        assert_eq!(interp.derivative(10.0), 0.0);
        assert_eq!(interp.node_sensitivity(0.5), vec![1.0, 0.0]);
        assert_eq!(interp.node_sensitivity(3.0), vec![0.0, 1.0]);
        assert!(!interp.in_range(3.0));
    }

    #[test]
    fn test_single_node_is_flat() {
        let interp = LinearInterpolator::new(vec![1.0], vec![0.03]).unwrap();
        assert_eq!(interp.interpolate(0.2), 0.03);
        assert_eq!(interp.interpolate(7.0), 0.03);
        assert_eq!(interp.node_sensitivity(7.0), vec![1.0]);
    }
}
