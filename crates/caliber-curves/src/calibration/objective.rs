//! Objective and Jacobian adapters for the root finder.

use caliber_core::Currency;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::jacobian::cumulative_jacobian;
use super::layout::CurveBuildingBlock;
use crate::calculators::CalibrationCalculator;
use crate::error::{CurveError, CurveResult};
use crate::generators::ConcreteGenerator;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// A curve being solved in a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCurve {
    /// Curve name.
    pub name: String,
    /// Currency of the curve.
    pub currency: Currency,
    /// Generator bound to the curve's instruments.
    pub generator: ConcreteGenerator,
}

/// Everything one root-finding pass needs.
///
/// `layout` covers only the unit's own curves; `known` holds the curves
/// the unit builds on and is never modified.
#[derive(Debug, Clone)]
pub struct UnitProblem<'a> {
    known: &'a CurveProvider,
    curves: Vec<UnitCurve>,
    layout: CurveBuildingBlock,
    instruments: Vec<InstrumentDerivative>,
}

impl<'a> UnitProblem<'a> {
    /// Creates a problem, checking that it is square.
    ///
    /// # Errors
    ///
    /// `Configuration` when the parameter count differs from the number of
    /// instruments.
    pub fn new(
        known: &'a CurveProvider,
        curves: Vec<UnitCurve>,
        instruments: Vec<InstrumentDerivative>,
    ) -> CurveResult<Self> {
        let layout = CurveBuildingBlock::from_lengths(
            curves
                .iter()
                .map(|c| (c.name.clone(), c.generator.parameter_count())),
        )?;
        if layout.total_length() != instruments.len() {
            return Err(CurveError::configuration(format!(
                "unit has {} parameters for {} instruments",
                layout.total_length(),
                instruments.len()
            )));
        }
        Ok(Self {
            known,
            curves,
            layout,
            instruments,
        })
    }

    /// Curves being solved, in parameter order.
    #[must_use]
    pub fn curves(&self) -> &[UnitCurve] {
        &self.curves
    }

    /// Unit-local parameter layout.
    #[must_use]
    pub fn layout(&self) -> &CurveBuildingBlock {
        &self.layout
    }

    /// Calibrating instruments in parameter order.
    #[must_use]
    pub fn instruments(&self) -> &[InstrumentDerivative] {
        &self.instruments
    }

    /// Known curves extended with the unit's curves at `parameters`.
    ///
    /// Curves are added in order, so a spread curve may sit on a curve
    /// declared before it in the same unit.
    pub fn build_curves(&self, parameters: &[f64]) -> CurveResult<CurveProvider> {
        if parameters.len() != self.layout.total_length() {
            return Err(CurveError::length_mismatch(
                "unit parameters",
                self.layout.total_length(),
                parameters.len(),
            ));
        }
        let mut provider = self.known.clone();
        for (curve, entry) in self.curves.iter().zip(self.layout.entries()) {
            let slice = &parameters[entry.start..entry.start + entry.length];
            let built = curve.generator.evaluate(slice, &provider)?;
            provider = provider.with_curve(curve.name.clone(), built, curve.currency)?;
        }
        Ok(provider)
    }
}

/// Instrument values as a function of the unit's parameters.
#[derive(Debug, Clone, Copy)]
pub struct UnitObjective<'p, 'a, C> {
    problem: &'p UnitProblem<'a>,
    calculator: &'p C,
}

impl<'p, 'a, C: CalibrationCalculator> UnitObjective<'p, 'a, C> {
    /// Creates the objective.
    #[must_use]
    pub fn new(problem: &'p UnitProblem<'a>, calculator: &'p C) -> Self {
        Self {
            problem,
            calculator,
        }
    }

    /// One value per instrument; zero at the calibrated parameters.
    pub fn evaluate(&self, parameters: &DVector<f64>) -> CurveResult<DVector<f64>> {
        let curves = self.problem.build_curves(parameters.as_slice())?;
        let values = self
            .problem
            .instruments
            .iter()
            .map(|derivative| self.calculator.value(derivative, &curves))
            .collect::<CurveResult<Vec<f64>>>()?;
        let values = DVector::from_vec(values);
        debug!(residual_norm = values.amax(), "evaluated unit objective");
        Ok(values)
    }
}

/// Derivative of [`UnitObjective`] with respect to the unit's parameters.
#[derive(Debug, Clone, Copy)]
pub struct UnitJacobian<'p, 'a, C> {
    problem: &'p UnitProblem<'a>,
    calculator: &'p C,
}

impl<'p, 'a, C: CalibrationCalculator> UnitJacobian<'p, 'a, C> {
    /// Creates the Jacobian.
    #[must_use]
    pub fn new(problem: &'p UnitProblem<'a>, calculator: &'p C) -> Self {
        Self {
            problem,
            calculator,
        }
    }

    /// Square matrix, one row per instrument, one column per parameter.
    pub fn evaluate(&self, parameters: &DVector<f64>) -> CurveResult<DMatrix<f64>> {
        let curves = self.problem.build_curves(parameters.as_slice())?;
        cumulative_jacobian(
            self.calculator,
            &self.problem.instruments,
            &curves,
            &self.problem.layout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::ParSpreadMarketQuote;
    use crate::instruments::CashDeposit;
    use crate::interpolation::InterpolationMethod;
    use approx::assert_relative_eq;
    use caliber_core::FxMatrix;

    fn deposit(end: f64, rate: f64) -> InstrumentDerivative {
        InstrumentDerivative::Deposit(CashDeposit {
            currency: Currency::USD,
            curve: "Dsc".to_string(),
            start_time: 0.0,
            end_time: end,
            accrual: end,
            notional: 1.0,
            rate,
        })
    }

    fn problem(known: &CurveProvider) -> UnitProblem<'_> {
        let curve = UnitCurve {
            name: "Dsc".to_string(),
            currency: Currency::USD,
            generator: ConcreteGenerator::Interpolated {
                method: InterpolationMethod::Linear,
                node_times: vec![0.5, 1.0],
                anchor: None,
            },
        };
        let instruments = vec![deposit(0.5, 0.01), deposit(1.0, 0.02)];
        UnitProblem::new(known, vec![curve], instruments).unwrap()
    }

    #[test]
    fn test_jacobian_matches_bumped_objective() {
        let known = CurveProvider::new(FxMatrix::default());
        let problem = problem(&known);
        let objective = UnitObjective::new(&problem, &ParSpreadMarketQuote);
        let jacobian = UnitJacobian::new(&problem, &ParSpreadMarketQuote);

        let x = DVector::from_vec(vec![0.011, 0.019]);
        let analytic = jacobian.evaluate(&x).unwrap();
        let base = objective.evaluate(&x).unwrap();
        let h = 1e-7;
        for j in 0..2 {
            let mut bumped = x.clone();
            bumped[j] += h;
            let up = objective.evaluate(&bumped).unwrap();
            for i in 0..2 {
                assert_relative_eq!(analytic[(i, j)], (up[i] - base[i]) / h, epsilon = 1e-5);
            }
        }
        // a deposit only sees the curve up to its own maturity
        assert_relative_eq!(analytic[(0, 1)], 0.0);
    }

    #[test]
    fn test_known_curves_untouched() {
        let known = CurveProvider::new(FxMatrix::default());
        let problem = problem(&known);
        let built = problem.build_curves(&[0.01, 0.02]).unwrap();
        assert!(built.contains("Dsc"));
        assert!(known.is_empty());
        assert!(problem.build_curves(&[0.01]).is_err());
    }

    #[test]
    fn test_not_square() {
        let known = CurveProvider::new(FxMatrix::default());
        let curve = UnitCurve {
            name: "Dsc".to_string(),
            currency: Currency::USD,
            generator: ConcreteGenerator::Constant,
        };
        let instruments = vec![deposit(0.5, 0.01), deposit(1.0, 0.02)];
        let err = UnitProblem::new(&known, vec![curve], instruments).unwrap_err();
        assert!(err.is_configuration());
    }
}
