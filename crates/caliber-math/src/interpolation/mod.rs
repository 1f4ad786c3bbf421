//! Node-based interpolation for curve construction.
//!
//! Every interpolator here is linear in its node values, so the value at
//! any `x` can be written as `Σ w_i(x) y_i`. The weights `w_i(x)` are
//! exposed through [`Interpolator::node_sensitivity`] and are what curve
//! calibration chains through to get parameter Jacobians.
//!
//! Outside the node range both interpolators extrapolate flat.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: piecewise linear
//! - [`NaturalCubicSpline`]: natural cubic spline (zero end curvature)

mod cubic_spline;
mod linear;

pub use cubic_spline::NaturalCubicSpline;
pub use linear::LinearInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for node-based interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> f64;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> f64;

    /// Returns `d interpolate(x) / d y_i` for every node `i`.
    fn node_sensitivity(&self, x: f64) -> Vec<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Validates node inputs shared by all interpolators.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], for interior x.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(xs.len() - 2),
        Err(i) => (i.saturating_sub(1)).min(xs.len() - 2),
    }
}
