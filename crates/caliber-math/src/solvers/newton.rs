//! Multidimensional Newton iteration.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use super::{
    check_dimensions, damped_step, no_progress, VectorRootFinder, VectorSolution,
    VectorSolverConfig,
};
use crate::error::MathError;
use crate::linear_algebra::solve_linear_system;

/// Newton's method with an analytic Jacobian.
///
/// Each iteration solves `J(x) Δx = -f(x)` and takes the largest step
/// `λ Δx`, `λ ∈ {1, 1/2, 1/4, ...}`, that reduces `‖f‖∞`. Quadratic
/// convergence near the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonVectorRootFinder {
    config: VectorSolverConfig,
}

impl NewtonVectorRootFinder {
    /// Creates a Newton solver.
    #[must_use]
    pub fn new(config: VectorSolverConfig) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &VectorSolverConfig {
        &self.config
    }
}

impl VectorRootFinder for NewtonVectorRootFinder {
    fn solve<E, F, J>(
        &self,
        objective: F,
        jacobian: J,
        initial_guess: &DVector<f64>,
    ) -> Result<VectorSolution, E>
    where
        E: From<MathError>,
        F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>,
        J: Fn(&DVector<f64>) -> Result<DMatrix<f64>, E>,
    {
        let config = &self.config;
        let mut x = initial_guess.clone();
        let mut f = objective(&x)?;
        check_dimensions(&f, &x)?;
        let mut norm = f.amax();

        if norm <= config.absolute_tolerance {
            return Ok(VectorSolution {
                x,
                iterations: 0,
                residual_norm: norm,
            });
        }

        for iteration in 1..=config.max_iterations {
            let jac = jacobian(&x)?;
            let direction = solve_linear_system(&jac, &(-&f))
                .map_err(|_| no_progress(iteration - 1, norm, &x))?;

            let tolerance = config.absolute_tolerance;
            let Some(step) = damped_step(&objective, &x, norm, &direction, tolerance)? else {
                return Err(no_progress(iteration - 1, norm, &x).into());
            };

            x = step.x;
            f = step.f;
            norm = step.norm;
            trace!(
                iteration,
                residual = norm,
                step = step.step_norm,
                "newton step"
            );

            if norm <= config.absolute_tolerance && config.step_converged(step.step_norm, &x) {
                return Ok(VectorSolution {
                    x,
                    iterations: iteration,
                    residual_norm: norm,
                });
            }
        }

        Err(no_progress(config.max_iterations, norm, &x).into())
    }
}
