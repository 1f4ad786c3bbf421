//! Zero-rate curve interpolated between nodes.

use caliber_math::interpolation::Interpolator;

use super::Curve;
use crate::error::{CurveError, CurveResult};
use crate::interpolation::{InterpolationMethod, NodeInterpolator};

/// A curve whose parameters are zero rates at fixed node times.
///
/// Parameters keep the order in which node times were supplied (the
/// instrument order); nodes are sorted internally. An optional anchor adds
/// a node with zero rate that is not a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedCurve {
    method: InterpolationMethod,
    interpolator: NodeInterpolator,
    /// Sorted node index -> parameter index (`None` for the anchor).
    node_parameters: Vec<Option<usize>>,
    parameter_count: usize,
}

impl InterpolatedCurve {
    /// Builds a curve from node times and zero rates.
    ///
    /// # Errors
    ///
    /// Fails when lengths differ, times repeat, or the anchor coincides
    /// with a node.
    pub fn new(
        times: &[f64],
        rates: &[f64],
        method: InterpolationMethod,
        anchor: Option<f64>,
    ) -> CurveResult<Self> {
        if times.len() != rates.len() {
            return Err(CurveError::length_mismatch(
                "interpolated curve parameters",
                times.len(),
                rates.len(),
            ));
        }

        let mut nodes: Vec<(f64, f64, Option<usize>)> = times
            .iter()
            .zip(rates)
            .enumerate()
            .map(|(i, (&t, &r))| (t, r, Some(i)))
            .collect();
        if let Some(anchor) = anchor {
            nodes.push((anchor, 0.0, None));
        }
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = nodes.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CurveError::configuration(format!(
                "duplicate curve node at time {:.6}",
                pair[0].0
            )));
        }

        let xs = nodes.iter().map(|n| n.0).collect();
        let ys = nodes.iter().map(|n| n.1).collect();
        let node_parameters = nodes.iter().map(|n| n.2).collect();

        Ok(Self {
            method,
            interpolator: method.build(xs, ys)?,
            node_parameters,
            parameter_count: times.len(),
        })
    }

    /// The interpolation method.
    #[must_use]
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }
}

impl Curve for InterpolatedCurve {
    fn zero_rate(&self, t: f64) -> f64 {
        self.interpolator.interpolate(t)
    }

    fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    fn parameter_sensitivity(&self, t: f64) -> Vec<f64> {
        let mut sensitivity = vec![0.0; self.parameter_count];
        for (weight, parameter) in self
            .interpolator
            .node_sensitivity(t)
            .into_iter()
            .zip(&self.node_parameters)
        {
            if let Some(p) = parameter {
                sensitivity[*p] += weight;
            }
        }
        sensitivity
    }
}
