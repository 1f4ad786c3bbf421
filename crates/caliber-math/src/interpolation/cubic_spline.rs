//! Natural cubic spline interpolation.

use nalgebra::{DMatrix, DVector};

use super::{find_segment, validate_nodes, Interpolator};
use crate::error::MathResult;
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline interpolation.
///
/// Piecewise cubic with continuous first and second derivatives and zero
/// second derivative at both end nodes. Flat outside the node range.
///
/// The second derivatives are a linear function of the node values,
/// `y2 = M y`; `M` is computed once at construction so node sensitivities
/// cost no more than an evaluation.
///
/// # Example
///
/// ```rust
/// use caliber_math::interpolation::{Interpolator, NaturalCubicSpline};
///
/// let spline = NaturalCubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap();
/// let y = spline.interpolate(1.5);
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    /// Maps node values to second derivatives
    curvature_map: DMatrix<f64>,
}

impl NaturalCubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// With one node the spline is constant, with two it is linear.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, lengths differ, or the
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        let curvature_map = curvature_map(&xs)?;
        let y2s = (&curvature_map * DVector::from_column_slice(&ys))
            .iter()
            .copied()
            .collect();

        Ok(Self {
            xs,
            ys,
            y2s,
            curvature_map,
        })
    }

    /// Returns the segment index and the `(a, b, h)` spline coordinates,
    /// or `None` outside the node range.
    fn coordinates(&self, x: f64) -> Option<(usize, f64, f64, f64)> {
        let n = self.xs.len();
        if n < 2 || x <= self.xs[0] || x >= self.xs[n - 1] {
            return None;
        }
        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        Some((i, a, b, h))
    }

    fn boundary_node(&self, x: f64) -> usize {
        if x <= self.xs[0] {
            0
        } else {
            self.xs.len() - 1
        }
    }
}

impl Interpolator for NaturalCubicSpline {
    fn interpolate(&self, x: f64) -> f64 {
        match self.coordinates(x) {
            None => self.ys[self.boundary_node(x)],
            Some((i, a, b, h)) => {
                a * self.ys[i]
                    + b * self.ys[i + 1]
                    + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h)
                        / 6.0
            }
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self.coordinates(x) {
            None => 0.0,
            Some((i, a, b, h)) => {
                (self.ys[i + 1] - self.ys[i]) / h
                    - (3.0 * a * a - 1.0) * h * self.y2s[i] / 6.0
                    + (3.0 * b * b - 1.0) * h * self.y2s[i + 1] / 6.0
            }
        }
    }

    fn node_sensitivity(&self, x: f64) -> Vec<f64> {
        let n = self.xs.len();
        let mut weights = vec![0.0; n];
        match self.coordinates(x) {
            None => weights[self.boundary_node(x)] = 1.0,
            Some((i, a, b, h)) => {
                let ca = (a * a * a - a) * h * h / 6.0;
                let cb = (b * b * b - b) * h * h / 6.0;
                for (j, w) in weights.iter_mut().enumerate() {
                    *w = ca * self.curvature_map[(i, j)] + cb * self.curvature_map[(i + 1, j)];
                }
                weights[i] += a;
                weights[i + 1] += b;
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

/// Builds `M` with `y2 = M y` for the natural end conditions.
///
/// Interior rows solve
/// `h[i-1] y2[i-1] + 2 (h[i-1] + h[i]) y2[i] + h[i] y2[i+1] = 6 (Δ[i] - Δ[i-1])`
/// where `Δ[i] = (y[i+1] - y[i]) / h[i]`.
fn curvature_map(xs: &[f64]) -> MathResult<DMatrix<f64>> {
    let n = xs.len();
    let mut map = DMatrix::zeros(n, n);
    if n < 3 {
        return Ok(map);
    }

    let m = n - 2;
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let lower: Vec<f64> = (1..m).map(|k| h[k]).collect();
    let diag: Vec<f64> = (0..m).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
    let upper: Vec<f64> = (0..m - 1).map(|k| h[k + 1]).collect();

    for j in 0..n {
        // right-hand side of the interior equations for y = e_j
        let rhs: Vec<f64> = (0..m)
            .map(|k| {
                let i = k + 1;
                let mut r = 0.0;
                if j == i + 1 {
                    r += 1.0 / h[i];
                }
                if j == i {
                    r -= 1.0 / h[i] + 1.0 / h[i - 1];
                }
                if j + 1 == i {
                    r += 1.0 / h[i - 1];
                }
                6.0 * r
            })
            .collect();
        let column = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
        for (k, value) in column.into_iter().enumerate() {
            map[(k + 1, j)] = value;
        }
    }

    Ok(map)
}
