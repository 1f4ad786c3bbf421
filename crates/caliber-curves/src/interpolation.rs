//! Interpolation methods for yield curves.

use caliber_math::interpolation::{Interpolator, LinearInterpolator, NaturalCubicSpline};
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;

/// Interpolation methods for curve nodes.
///
/// Both methods interpolate continuously compounded zero rates and
/// extrapolate flat beyond the first and last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear interpolation on zero rates.
    #[default]
    Linear,

    /// Natural cubic spline on zero rates.
    NaturalCubicSpline,
}

impl InterpolationMethod {
    /// Builds the interpolator for the given nodes.
    pub fn build(self, xs: Vec<f64>, ys: Vec<f64>) -> CurveResult<NodeInterpolator> {
        Ok(match self {
            Self::Linear => NodeInterpolator::Linear(LinearInterpolator::new(xs, ys)?),
            Self::NaturalCubicSpline => {
                NodeInterpolator::NaturalCubicSpline(NaturalCubicSpline::new(xs, ys)?)
            }
        })
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::NaturalCubicSpline => "Natural Cubic Spline",
        };
        write!(f, "{name}")
    }
}

/// A concrete interpolator selected by [`InterpolationMethod`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeInterpolator {
    /// Piecewise linear.
    Linear(LinearInterpolator),
    /// Natural cubic spline.
    NaturalCubicSpline(NaturalCubicSpline),
}

impl Interpolator for NodeInterpolator {
    fn interpolate(&self, x: f64) -> f64 {
        match self {
            Self::Linear(i) => i.interpolate(x),
            Self::NaturalCubicSpline(i) => i.interpolate(x),
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self {
            Self::Linear(i) => i.derivative(x),
            Self::NaturalCubicSpline(i) => i.derivative(x),
        }
    }

    fn node_sensitivity(&self, x: f64) -> Vec<f64> {
        match self {
            Self::Linear(i) => i.node_sensitivity(x),
            Self::NaturalCubicSpline(i) => i.node_sensitivity(x),
        }
    }

    fn min_x(&self) -> f64 {
        match self {
            Self::Linear(i) => i.min_x(),
            Self::NaturalCubicSpline(i) => i.min_x(),
        }
    }

    fn max_x(&self) -> f64 {
        match self {
            Self::Linear(i) => i.max_x(),
            Self::NaturalCubicSpline(i) => i.max_x(),
        }
    }
}
