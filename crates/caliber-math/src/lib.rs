//! # Caliber Math
//!
//! Numerical building blocks for the Caliber calibration engine.
//!
//! This crate provides:
//!
//! - **Interpolation**: node-based interpolators that also report the
//!   sensitivity of an interpolated value to each node value
//! - **Linear Algebra**: tridiagonal and dense solves, matrix inversion
//! - **Solvers**: multidimensional Newton and Broyden root finders driven
//!   by an analytic Jacobian
//!
//! ## Example
//!
//! ```rust
//! use caliber_math::prelude::*;
//! use nalgebra::{DMatrix, DVector};
//!
//! // x^2 + y^2 = 4 and x = y
//! let objective = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
//!     Ok(DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 4.0, x[0] - x[1]]))
//! };
//! let jacobian = |x: &DVector<f64>| -> MathResult<DMatrix<f64>> {
//!     Ok(DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0]))
//! };
//!
//! let solver = NewtonVectorRootFinder::new(VectorSolverConfig::default());
//! let solution = solver
//!     .solve(objective, jacobian, &DVector::from_vec(vec![1.0, 1.5]))
//!     .unwrap();
//! assert!((solution.x[0] - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator, NaturalCubicSpline};
    pub use crate::linear_algebra::{invert, solve_linear_system};
    pub use crate::solvers::{
        BroydenVectorRootFinder, NewtonVectorRootFinder, VectorRootFinder, VectorSolution,
        VectorSolverConfig,
    };
}

pub use error::{MathError, MathResult};
