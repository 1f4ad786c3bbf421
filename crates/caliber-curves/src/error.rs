//! Error types for curve construction and calibration.

use caliber_core::{CoreError, Date};
use caliber_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur while building or calibrating curves.
///
/// Configuration problems (`Configuration`, `UnknownCurve`, `DuplicateCurve`,
/// `MissingFixing`, `LengthMismatch`) are raised before a unit is solved.
/// `NonConvergence` and `SingularJacobian` are numerical failures of a solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Inconsistent curve, generator or instrument wiring.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// A curve name is neither known nor produced by the current unit.
    #[error("Unknown curve: {name}")]
    UnknownCurve {
        /// The missing curve name.
        name: String,
    },

    /// A curve name is already taken.
    #[error("Curve already exists: {name}")]
    DuplicateCurve {
        /// The duplicated curve name.
        name: String,
    },

    /// The root finder did not reach the tolerances.
    #[error(
        "Calibration did not converge after {iterations} iterations (residual norm: {residual_norm:.2e})"
    )]
    NonConvergence {
        /// Iterations performed.
        iterations: u32,
        /// Infinity norm of the residual at the last iterate.
        residual_norm: f64,
        /// The last parameter vector tried.
        last_parameters: Vec<f64>,
    },

    /// The calibrated Jacobian could not be inverted.
    #[error("Singular Jacobian ({size}x{size}): {reason}")]
    SingularJacobian {
        /// Dimension of the Jacobian.
        size: usize,
        /// Why inversion failed.
        reason: String,
    },

    /// A historical fixing needed to price an instrument is absent.
    #[error("Missing fixing for {index} on {date}")]
    MissingFixing {
        /// Index name.
        index: String,
        /// Fixing date.
        date: Date,
    },

    /// Two vectors that must line up have different lengths.
    #[error("Length mismatch for {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being combined.
        context: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Invalid instrument economics.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of the problem.
        reason: String,
    },

    /// Invalid calibration settings.
    #[error("Invalid calibration config: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Numerical error from the math layer.
    #[error("Math error: {reason}")]
    Math {
        /// Description of the error.
        reason: String,
    },

    /// Date or convention error from the core layer.
    #[error("Date error: {reason}")]
    Core {
        /// Description of the error.
        reason: String,
    },
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates an unknown curve error.
    #[must_use]
    pub fn unknown_curve(name: impl Into<String>) -> Self {
        Self::UnknownCurve { name: name.into() }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates a singular Jacobian error.
    #[must_use]
    pub fn singular_jacobian(size: usize, reason: impl Into<String>) -> Self {
        Self::SingularJacobian {
            size,
            reason: reason.into(),
        }
    }

    /// True for errors caused by wiring rather than numerics.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::UnknownCurve { .. }
                | Self::DuplicateCurve { .. }
                | Self::MissingFixing { .. }
                | Self::LengthMismatch { .. }
                | Self::InvalidInstrument { .. }
        )
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
                last_point,
            } => Self::NonConvergence {
                iterations,
                residual_norm: residual,
                last_parameters: last_point,
            },
            other => Self::Math {
                reason: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CurveError {
    fn from(err: CoreError) -> Self {
        Self::Core {
            reason: err.to_string(),
        }
    }
}
