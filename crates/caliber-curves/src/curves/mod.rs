//! Concrete yield curves.
//!
//! Every curve is described by continuously compounded zero rates `r(t)`
//! with `t` in years from the valuation date (ACT/365F). Curves report how
//! `r(t)` moves with their own parameters, which is what turns node-level
//! pricing sensitivities into calibration Jacobians.

mod composite;
mod constant;
mod interpolated;

pub use composite::{SpreadCurve, SumCurve};
pub use constant::ConstantCurve;
pub use interpolated::InterpolatedCurve;

/// Common interface of all curves.
pub trait Curve: Send + Sync {
    /// Continuously compounded zero rate at time `t`.
    fn zero_rate(&self, t: f64) -> f64;

    /// Discount factor `exp(-r(t) t)`.
    fn discount_factor(&self, t: f64) -> f64 {
        (-self.zero_rate(t) * t).exp()
    }

    /// Simply compounded forward rate between two times.
    fn forward_rate(&self, start: f64, end: f64, accrual: f64) -> f64 {
        (self.discount_factor(start) / self.discount_factor(end) - 1.0) / accrual
    }

    /// Number of parameters owned by this curve.
    fn parameter_count(&self) -> usize;

    /// `d r(t) / d p_i` for each own parameter `p_i`.
    fn parameter_sensitivity(&self, t: f64) -> Vec<f64>;
}

/// A concrete curve produced by a curve generator.
#[derive(Debug, Clone, PartialEq)]
pub enum YieldCurve {
    /// Zero rates interpolated between nodes.
    Interpolated(InterpolatedCurve),
    /// A single flat zero rate.
    Constant(ConstantCurve),
    /// The sum of several curves.
    Sum(SumCurve),
    /// An existing named curve plus a spread curve.
    Spread(SpreadCurve),
}

impl YieldCurve {
    /// Curves owned elsewhere whose parameters also move this curve's rates.
    ///
    /// Sensitivities to those curves are attributed to them by name rather
    /// than to this curve's own parameters.
    pub fn underlying_curves(&self) -> Vec<(&str, &YieldCurve)> {
        match self {
            YieldCurve::Interpolated(_) | YieldCurve::Constant(_) => Vec::new(),
            YieldCurve::Sum(sum) => sum
                .components()
                .iter()
                .flat_map(YieldCurve::underlying_curves)
                .collect(),
            YieldCurve::Spread(spread) => {
                let mut curves = vec![(spread.base_name(), spread.base())];
                curves.extend(spread.spread().underlying_curves());
                curves
            }
        }
    }
}

impl Curve for YieldCurve {
    fn zero_rate(&self, t: f64) -> f64 {
        match self {
            YieldCurve::Interpolated(c) => c.zero_rate(t),
            YieldCurve::Constant(c) => c.zero_rate(t),
            YieldCurve::Sum(c) => c.zero_rate(t),
            YieldCurve::Spread(c) => c.zero_rate(t),
        }
    }

    fn parameter_count(&self) -> usize {
        match self {
            YieldCurve::Interpolated(c) => c.parameter_count(),
            YieldCurve::Constant(c) => c.parameter_count(),
            YieldCurve::Sum(c) => c.parameter_count(),
            YieldCurve::Spread(c) => c.parameter_count(),
        }
    }

    fn parameter_sensitivity(&self, t: f64) -> Vec<f64> {
        match self {
            YieldCurve::Interpolated(c) => c.parameter_sensitivity(t),
            YieldCurve::Constant(c) => c.parameter_sensitivity(t),
            YieldCurve::Sum(c) => c.parameter_sensitivity(t),
            YieldCurve::Spread(c) => c.parameter_sensitivity(t),
        }
    }
}

impl From<InterpolatedCurve> for YieldCurve {
    fn from(curve: InterpolatedCurve) -> Self {
        YieldCurve::Interpolated(curve)
    }
}

impl From<ConstantCurve> for YieldCurve {
    fn from(curve: ConstantCurve) -> Self {
        YieldCurve::Constant(curve)
    }
}
