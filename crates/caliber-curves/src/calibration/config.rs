//! Calibration configuration.

use caliber_math::solvers::{VectorSolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Root finder used to solve each calibration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RootFinderKind {
    /// Newton with the analytic Jacobian at every step.
    #[default]
    Newton,
    /// Broyden updates between analytic Jacobians.
    Broyden,
}

/// Tolerances and solver choice for a whole calibration run.
///
/// # Example
///
/// ```rust
/// use caliber_curves::calibration::{CalibrationConfig, RootFinderKind};
///
/// let config = CalibrationConfig::from_toml_str(
///     r#"
///     max_iterations = 50
///     root_finder = "Broyden"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.root_finder, RootFinderKind::Broyden);
/// assert_eq!(config.absolute_tolerance, 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Bound on the largest instrument value at the solution.
    #[serde(default = "default_tolerance")]
    pub absolute_tolerance: f64,

    /// Bound on the last parameter step, relative to the parameters.
    #[serde(default = "default_tolerance")]
    pub relative_tolerance: f64,

    /// Root finder iteration cap per unit.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Root finder.
    #[serde(default)]
    pub root_finder: RootFinderKind,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: default_tolerance(),
            relative_tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            root_finder: RootFinderKind::default(),
        }
    }
}

impl CalibrationConfig {
    /// Sets the absolute tolerance.
    #[must_use]
    pub fn with_absolute_tolerance(mut self, tolerance: f64) -> Self {
        self.absolute_tolerance = tolerance;
        self
    }

    /// Sets the relative tolerance.
    #[must_use]
    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the root finder.
    #[must_use]
    pub fn with_root_finder(mut self, root_finder: RootFinderKind) -> Self {
        self.root_finder = root_finder;
        self
    }

    /// Parses a configuration from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> CurveResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CurveError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that tolerances are positive and the iteration cap non-zero.
    pub fn validate(&self) -> CurveResult<()> {
        for (name, value) in [
            ("absolute_tolerance", self.absolute_tolerance),
            ("relative_tolerance", self.relative_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CurveError::InvalidConfig {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if self.max_iterations == 0 {
            return Err(CurveError::InvalidConfig {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Root finder settings.
    #[must_use]
    pub fn solver_config(&self) -> VectorSolverConfig {
        VectorSolverConfig::new(
            self.absolute_tolerance,
            self.relative_tolerance,
            self.max_iterations,
        )
    }
}
