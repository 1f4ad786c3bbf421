//! Multidimensional root finding.
//!
//! Solves `f(x) = 0` for `f: Rⁿ → Rⁿ` given an analytic Jacobian:
//!
//! - [`NewtonVectorRootFinder`]: full Newton, Jacobian re-evaluated every step
//! - [`BroydenVectorRootFinder`]: Broyden rank-one updates seeded with the
//!   analytic Jacobian, re-seeded when an update stops making progress
//!
//! Both damp the step by halving until the residual norm decreases.
//!
//! # Convergence
//!
//! A solve converges when `‖f(x)‖∞ ≤ absolute_tolerance` and the last step
//! satisfies `‖Δx‖∞ ≤ relative_tolerance · max(1, ‖x‖∞)`. A starting point
//! whose residual is already within tolerance is returned as is. Running out
//! of iterations, or a step that cannot reduce the residual, fails with
//! [`MathError::ConvergenceFailed`] carrying the last iterate.

mod broyden;
mod newton;

pub use broyden::BroydenVectorRootFinder;
pub use newton::NewtonVectorRootFinder;

use nalgebra::{DMatrix, DVector};

use crate::error::MathError;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Maximum number of step halvings in the line search.
const MAX_STEP_HALVINGS: u32 = 30;

/// Configuration for vector root finders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSolverConfig {
    /// Bound on the infinity norm of the residual.
    pub absolute_tolerance: f64,
    /// Bound on the last step, relative to the size of the iterate.
    pub relative_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for VectorSolverConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_TOLERANCE,
            relative_tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl VectorSolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(absolute_tolerance: f64, relative_tolerance: f64, max_iterations: u32) -> Self {
        Self {
            absolute_tolerance,
            relative_tolerance,
            max_iterations,
        }
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn step_converged(&self, step_norm: f64, x: &DVector<f64>) -> bool {
        step_norm <= self.relative_tolerance * x.amax().max(1.0)
    }
}

/// A converged root.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSolution {
    /// The root.
    pub x: DVector<f64>,
    /// Number of steps taken.
    pub iterations: u32,
    /// Infinity norm of the residual at the root.
    pub residual_norm: f64,
}

/// Trait for multidimensional root finders.
///
/// The objective and Jacobian are fallible so that callers can surface their
/// own errors; solver failures are converted into the caller's error type.
pub trait VectorRootFinder {
    /// Finds `x` with `objective(x) ≈ 0`, starting from `initial_guess`.
    fn solve<E, F, J>(
        &self,
        objective: F,
        jacobian: J,
        initial_guess: &DVector<f64>,
    ) -> Result<VectorSolution, E>
    where
        E: From<MathError>,
        F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>,
        J: Fn(&DVector<f64>) -> Result<DMatrix<f64>, E>;
}

/// Outcome of a damped step.
struct Step {
    x: DVector<f64>,
    f: DVector<f64>,
    norm: f64,
    step_norm: f64,
}

/// Halves `direction` until the residual norm decreases, or until it falls
/// within the absolute tolerance. `None` when no damping factor helps.
fn damped_step<E, F>(
    objective: &F,
    x: &DVector<f64>,
    norm: f64,
    direction: &DVector<f64>,
    absolute_tolerance: f64,
) -> Result<Option<Step>, E>
where
    F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let mut lambda = 1.0;
    for _ in 0..=MAX_STEP_HALVINGS {
        let candidate = x + direction * lambda;
        let f = objective(&candidate)?;
        let candidate_norm = f.amax();
        if candidate_norm.is_finite()
            && (candidate_norm < norm || candidate_norm <= absolute_tolerance)
        {
            return Ok(Some(Step {
                x: candidate,
                f,
                norm: candidate_norm,
                step_norm: direction.amax() * lambda,
            }));
        }
        lambda *= 0.5;
    }
    Ok(None)
}

fn check_dimensions(f: &DVector<f64>, x: &DVector<f64>) -> Result<(), MathError> {
    if f.len() != x.len() {
        return Err(MathError::DimensionMismatch {
            rows1: f.len(),
            cols1: 1,
            rows2: x.len(),
            cols2: 1,
        });
    }
    Ok(())
}

fn no_progress(iterations: u32, norm: f64, x: &DVector<f64>) -> MathError {
    MathError::convergence_failed(iterations, norm, x.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathResult;
    use approx::assert_relative_eq;

    fn circle(x: &DVector<f64>) -> MathResult<DVector<f64>> {
        Ok(DVector::from_vec(vec![
            x[0] * x[0] + x[1] * x[1] - 4.0,
            x[0] - x[1],
        ]))
    }

    fn circle_jacobian(x: &DVector<f64>) -> MathResult<DMatrix<f64>> {
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0],
        ))
    }

    #[test]
    fn test_both_solvers_agree() {
        let guess = DVector::from_vec(vec![1.0, 1.5]);
        let newton = NewtonVectorRootFinder::default()
            .solve(circle, circle_jacobian, &guess)
            .unwrap();
        let broyden = BroydenVectorRootFinder::default()
            .solve(circle, circle_jacobian, &guess)
            .unwrap();

        for solution in [&newton, &broyden] {
            assert_relative_eq!(solution.x[0], std::f64::consts::SQRT_2, epsilon = 1e-10);
            assert_relative_eq!(solution.x[1], std::f64::consts::SQRT_2, epsilon = 1e-10);
            assert!(solution.residual_norm <= DEFAULT_TOLERANCE);
        }
        assert!(newton.iterations <= broyden.iterations + 1);
    }

    #[test]
    fn test_root_at_initial_guess() {
        let root = DVector::from_vec(vec![2.0_f64.sqrt(), 2.0_f64.sqrt()]);
        let solution = NewtonVectorRootFinder::default()
            .solve(circle, circle_jacobian, &root)
            .unwrap();
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, root);
    }

    #[test]
    fn test_iteration_cap_reports_last_point() {
        let config = VectorSolverConfig::default().with_max_iterations(1);
        let err = NewtonVectorRootFinder::new(config)
            .solve(circle, circle_jacobian, &DVector::from_vec(vec![10.0, 0.5]))
            .unwrap_err();
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
                last_point,
            } => {
                assert_eq!(iterations, 1);
                assert!(residual > DEFAULT_TOLERANCE);
                assert_eq!(last_point.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_root_fails() {
        // x^2 + 1 = 0 has no real root
        let objective = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[0] + 1.0]))
        };
        let jacobian = |x: &DVector<f64>| -> MathResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let result = NewtonVectorRootFinder::default().solve(
            objective,
            jacobian,
            &DVector::from_vec(vec![0.7]),
        );
        assert!(matches!(result, Err(MathError::ConvergenceFailed { .. })));
    }

    #[test]
    fn test_dimension_mismatch() {
        let objective =
            |_: &DVector<f64>| -> MathResult<DVector<f64>> { Ok(DVector::from_vec(vec![1.0])) };
        let jacobian =
            |_: &DVector<f64>| -> MathResult<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };
        let result = BroydenVectorRootFinder::default().solve(
            objective,
            jacobian,
            &DVector::from_vec(vec![0.0, 0.0]),
        );
        assert!(matches!(result, Err(MathError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_caller_error_propagates() {
        #[derive(Debug, PartialEq)]
        enum CallerError {
            Math,
            Pricing,
        }
        impl From<MathError> for CallerError {
            fn from(_: MathError) -> Self {
                CallerError::Math
            }
        }

        let objective =
            |_: &DVector<f64>| -> Result<DVector<f64>, CallerError> { Err(CallerError::Pricing) };
        let jacobian = |_: &DVector<f64>| -> Result<DMatrix<f64>, CallerError> {
            Ok(DMatrix::identity(1, 1))
        };
        let result =
            NewtonVectorRootFinder::default().solve(objective, jacobian, &DVector::zeros(1));
        assert_eq!(result.unwrap_err(), CallerError::Pricing);
    }
}
