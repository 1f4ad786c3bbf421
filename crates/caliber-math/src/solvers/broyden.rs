//! Broyden's quasi-Newton method.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use super::{
    check_dimensions, damped_step, no_progress, VectorRootFinder, VectorSolution,
    VectorSolverConfig,
};
use crate::error::MathError;
use crate::linear_algebra::solve_linear_system;

/// Broyden's "good" method seeded with the analytic Jacobian.
///
/// After each step `s` with residual change `y` the Jacobian estimate is
/// updated as `B += (y - B s) sᵀ / (sᵀ s)`. When a step taken on the
/// estimate cannot reduce the residual, or the estimate becomes singular,
/// the analytic Jacobian is evaluated again. Failing on a fresh analytic
/// Jacobian is a convergence failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroydenVectorRootFinder {
    config: VectorSolverConfig,
}

impl BroydenVectorRootFinder {
    /// Creates a Broyden solver.
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

impl VectorRootFinder for BroydenVectorRootFinder {
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

        let mut estimate = jacobian(&x)?;
        let mut fresh = true;
        let mut iteration = 0;

        while iteration < config.max_iterations {
            let step = match solve_linear_system(&estimate, &(-&f)) {
                Ok(direction) => {
                    damped_step(&objective, &x, norm, &direction, config.absolute_tolerance)?
                }
                Err(_) => None,
            };

            let Some(step) = step else {
                if fresh {
                    return Err(no_progress(iteration, norm, &x).into());
                }
                trace!(iteration, "broyden estimate stalled, re-seeding jacobian");
                estimate = jacobian(&x)?;
                fresh = true;
                continue;
            };

            iteration += 1;
            let s = &step.x - &x;
            let y = &step.f - &f;
            let ss = s.dot(&s);
            if ss > 0.0 {
                let correction = (&y - &estimate * &s) / ss;
                estimate += correction * s.transpose();
            }
            fresh = false;

            x = step.x;
            f = step.f;
            norm = step.norm;
            trace!(
                iteration,
                residual = norm,
                step = step.step_norm,
                "broyden step"
            );

            if norm <= config.absolute_tolerance && config.step_converged(step.step_norm, &x) {
                return Ok(VectorSolution {
                    x,
                    iterations: iteration,
                    residual_norm: norm,
                });
            }
        }

        Err(no_progress(iteration, norm, &x).into())
    }
}
