//! The block driver.

use std::collections::BTreeSet;
use std::sync::Arc;

use caliber_math::solvers::{
    BroydenVectorRootFinder, NewtonVectorRootFinder, VectorRootFinder, VectorSolution,
};
use nalgebra::DVector;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::bundle::CurveBuildingBlockBundle;
use super::config::{CalibrationConfig, RootFinderKind};
use super::jacobian::{cumulative_jacobian, curve_rows, invert_jacobian};
use super::layout::CurveBuildingBlock;
use super::objective::{UnitCurve, UnitJacobian, UnitObjective, UnitProblem};
use super::unit::{CalibrationBlock, CalibrationUnit, MarketContext};
use crate::calculators::CalibrationCalculator;
use crate::error::{CurveError, CurveResult};
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// Diagnostics of one solved unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    /// Curves solved, in parameter order.
    pub curve_names: Vec<String>,
    /// Number of calibrating instruments, equal to the parameter count.
    pub instrument_count: usize,
    /// Root-finder iterations.
    pub iterations: u32,
    /// Largest absolute instrument value at the solution.
    pub residual_norm: f64,
    /// Solved parameters.
    pub parameters: Vec<f64>,
}

/// Output of a calibrated block.
#[derive(Debug, Clone)]
pub struct CalibrationResult {
    /// Seed curves plus every calibrated curve.
    pub curves: CurveProvider,
    /// Inverse-Jacobian slices of the calibrated curves.
    pub bundle: CurveBuildingBlockBundle,
    /// One report per unit, in calibration order.
    pub reports: Vec<UnitReport>,
}

/// What a block has produced so far.
///
/// Each unit step consumes a state and returns the next one; seed curves
/// are fixed inputs and take no part in the parameter layout.
#[derive(Debug, Clone)]
pub struct BlockState {
    curves: CurveProvider,
    layout: Arc<CurveBuildingBlock>,
    instruments: Vec<InstrumentDerivative>,
    bundle: CurveBuildingBlockBundle,
    reports: Vec<UnitReport>,
}

impl BlockState {
    /// Starts a block from seed curves.
    #[must_use]
    pub fn new(seed: CurveProvider) -> Self {
        Self {
            curves: seed,
            layout: Arc::new(CurveBuildingBlock::default()),
            instruments: Vec::new(),
            bundle: CurveBuildingBlockBundle::new(),
            reports: Vec::new(),
        }
    }

    /// Known curves.
    #[must_use]
    pub fn curves(&self) -> &CurveProvider {
        &self.curves
    }

    /// Layout of every parameter calibrated so far.
    #[must_use]
    pub fn layout(&self) -> &CurveBuildingBlock {
        &self.layout
    }

    /// Instruments calibrated so far, in layout order.
    #[must_use]
    pub fn instruments(&self) -> &[InstrumentDerivative] {
        &self.instruments
    }

    /// Bundle of the curves calibrated so far.
    #[must_use]
    pub fn bundle(&self) -> &CurveBuildingBlockBundle {
        &self.bundle
    }

    /// Unit reports so far.
    #[must_use]
    pub fn reports(&self) -> &[UnitReport] {
        &self.reports
    }

    /// Finishes the block.
    #[must_use]
    pub fn into_result(self) -> CalibrationResult {
        CalibrationResult {
            curves: self.curves,
            bundle: self.bundle,
            reports: self.reports,
        }
    }
}

/// Calibrates blocks of units against a valuation calculator.
///
/// The calculator defines what "calibrated" means: par spreads for
/// [`ParSpreadMarketQuote`](crate::calculators::ParSpreadMarketQuote),
/// present values for [`PresentValue`](crate::calculators::PresentValue).
///
/// # Example
///
/// ```rust
/// use caliber_core::{Currency, Date, FxMatrix, Period};
/// use caliber_curves::calculators::ParSpreadMarketQuote;
/// use caliber_curves::calibration::{
///     CalibrationBlock, CalibrationConfig, CalibrationUnit, CurveCalibrationSpec,
///     CurveCalibrator, MarketContext,
/// };
/// use caliber_curves::generators::CurveGenerator;
/// use caliber_curves::instruments::{
///     CurveNameMap, DepositConvention, InstrumentGenerator, MarketInstrumentSpec,
/// };
/// use caliber_curves::interpolation::InterpolationMethod;
/// use caliber_curves::provider::CurveProvider;
///
/// let today = Date::from_ymd(2011, 9, 28).unwrap();
/// let names = CurveNameMap::new().with_discounting(Currency::USD, "USD Dsc");
/// let market = MarketContext::new(today, names);
///
/// let deposit = InstrumentGenerator::OvernightDeposit(DepositConvention::usd_overnight_deposit());
/// let instruments = vec![
///     MarketInstrumentSpec::new(0.0010, deposit.clone(), Period::days(0)),
///     MarketInstrumentSpec::new(0.0011, deposit, Period::days(1)),
/// ];
/// let curve = CurveCalibrationSpec::new(
///     "USD Dsc",
///     Currency::USD,
///     CurveGenerator::interpolated(InterpolationMethod::Linear),
///     instruments,
/// );
/// let block = CalibrationBlock::new("USD", vec![CalibrationUnit::new(vec![curve])]);
///
/// let calibrator = CurveCalibrator::new(CalibrationConfig::default(), ParSpreadMarketQuote).unwrap();
/// let seed = CurveProvider::new(FxMatrix::default());
/// let result = calibrator.calibrate_block(&block, &market, seed).unwrap();
/// assert!(result.curves.contains("USD Dsc"));
/// assert!(result.reports[0].residual_norm <= 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct CurveCalibrator<C> {
    config: CalibrationConfig,
    calculator: C,
}

impl<C: CalibrationCalculator> CurveCalibrator<C> {
    /// Creates a calibrator.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(config: CalibrationConfig, calculator: C) -> CurveResult<Self> {
        config.validate()?;
        Ok(Self { config, calculator })
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// The calibration target.
    #[must_use]
    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Calibrates one unit on top of `state`.
    ///
    /// On failure nothing from the unit is published: the error is returned
    /// and `state` is dropped.
    ///
    /// # Errors
    ///
    /// `Configuration`, `UnknownCurve` or `DuplicateCurve` for wiring
    /// problems, `NonConvergence` when the root finder fails and
    /// `SingularJacobian` when the cumulative Jacobian cannot be inverted.
    pub fn calibrate_unit(
        &self,
        state: BlockState,
        unit: &CalibrationUnit,
        market: &MarketContext,
    ) -> CurveResult<BlockState> {
        let problem = self.unit_problem(&state.curves, unit, market)?;
        let names: Vec<String> = unit.curve_names().map(str::to_string).collect();

        let quotes: Vec<f64> = unit
            .curves
            .iter()
            .flat_map(|c| c.instruments.iter().map(|i| i.quote))
            .collect();
        let mut guess = Vec::with_capacity(quotes.len());
        for (curve, entry) in problem.curves().iter().zip(problem.layout().entries()) {
            guess.extend(
                curve
                    .generator
                    .initial_guess(&quotes[entry.start..entry.start + entry.length])?,
            );
        }

        let solution = self
            .solve(&problem, &DVector::from_vec(guess))
            .map_err(|err| {
                warn!(curves = ?names, error = %err, "unit calibration failed");
                err
            })?;
        debug!(curves = ?names, parameters = ?solution.x.as_slice(), "unit solved");

        let curves = problem.build_curves(solution.x.as_slice())?;
        let layout = state.layout.extended(
            problem
                .layout()
                .entries()
                .iter()
                .map(|e| (e.name.clone(), e.length)),
        )?;
        let layout = Arc::new(layout);
        let mut instruments = state.instruments;
        instruments.extend_from_slice(problem.instruments());

        let jacobian = cumulative_jacobian(&self.calculator, &instruments, &curves, &layout)?;
        let inverse = invert_jacobian(&jacobian).map_err(|err| {
            warn!(curves = ?names, error = %err, "calibration Jacobian not invertible");
            err
        })?;
        let mut bundle = state.bundle;
        for name in &names {
            let rows = curve_rows(&inverse, &layout, name)?;
            bundle = bundle.with_entry(name.clone(), Arc::clone(&layout), rows)?;
        }

        info!(
            curves = ?names,
            instruments = problem.instruments().len(),
            iterations = solution.iterations,
            residual_norm = solution.residual_norm,
            "calibrated unit"
        );
        let mut reports = state.reports;
        reports.push(UnitReport {
            curve_names: names,
            instrument_count: problem.instruments().len(),
            iterations: solution.iterations,
            residual_norm: solution.residual_norm,
            parameters: solution.x.as_slice().to_vec(),
        });

        Ok(BlockState {
            curves,
            layout,
            instruments,
            bundle,
            reports,
        })
    }

    /// Calibrates the units of `block` in order on top of `seed`.
    pub fn calibrate_block(
        &self,
        block: &CalibrationBlock,
        market: &MarketContext,
        seed: CurveProvider,
    ) -> CurveResult<CalibrationResult> {
        info!(
            block = %block.name,
            units = block.units.len(),
            valuation_date = %market.valuation_date,
            "calibrating block"
        );
        let state = block
            .units
            .iter()
            .try_fold(BlockState::new(seed), |state, unit| {
                self.calibrate_unit(state, unit, market)
            })
            .map_err(|err| {
                warn!(block = %block.name, error = %err, "block failed");
                err
            })?;
        Ok(state.into_result())
    }

    /// Calibrates independent blocks one after another, each from its own
    /// copy of `seed`.
    pub fn calibrate_blocks(
        &self,
        blocks: &[CalibrationBlock],
        market: &MarketContext,
        seed: &CurveProvider,
    ) -> CurveResult<Vec<CalibrationResult>> {
        blocks
            .iter()
            .map(|block| self.calibrate_block(block, market, seed.clone()))
            .collect()
    }

    /// Like [`calibrate_blocks`](Self::calibrate_blocks) with blocks run in
    /// parallel. Results come back in block order.
    #[cfg(feature = "parallel")]
    pub fn calibrate_blocks_parallel(
        &self,
        blocks: &[CalibrationBlock],
        market: &MarketContext,
        seed: &CurveProvider,
    ) -> CurveResult<Vec<CalibrationResult>> {
        use rayon::prelude::*;

        blocks
            .par_iter()
            .map(|block| self.calibrate_block(block, market, seed.clone()))
            .collect()
    }

    fn unit_problem<'a>(
        &self,
        known: &'a CurveProvider,
        unit: &CalibrationUnit,
        market: &MarketContext,
    ) -> CurveResult<UnitProblem<'a>> {
        if unit.curves.is_empty() {
            return Err(CurveError::configuration("calibration unit has no curves"));
        }
        let mut available: BTreeSet<&str> = known.names().iter().map(String::as_str).collect();
        let mut curves = Vec::with_capacity(unit.curves.len());
        let mut instruments = Vec::with_capacity(unit.instrument_count());

        for spec in &unit.curves {
            if !available.insert(spec.name.as_str()) {
                return Err(CurveError::DuplicateCurve {
                    name: spec.name.clone(),
                });
            }
            let derivatives = spec
                .instruments
                .iter()
                .map(|i| {
                    i.to_derivative(market.valuation_date, &market.curve_names, &market.fixings)
                })
                .collect::<CurveResult<Vec<_>>>()?;
            let generator = spec.generator.finalize(&derivatives).map_err(|err| {
                CurveError::configuration(format!("curve {}: {err}", spec.name))
            })?;
            for base in generator.base_curves() {
                if !available.contains(base) || base == spec.name {
                    return Err(CurveError::unknown_curve(base));
                }
            }
            curves.push(UnitCurve {
                name: spec.name.clone(),
                currency: spec.currency,
                generator,
            });
            instruments.extend(derivatives);
        }

        for derivative in &instruments {
            for name in derivative.curve_names() {
                if !available.contains(name) {
                    return Err(CurveError::unknown_curve(name));
                }
            }
        }
        debug!(
            curves = ?unit.curve_names().collect::<Vec<_>>(),
            instruments = instruments.len(),
            "prepared calibration unit"
        );
        UnitProblem::new(known, curves, instruments)
    }

    fn solve(
        &self,
        problem: &UnitProblem<'_>,
        guess: &DVector<f64>,
    ) -> CurveResult<VectorSolution> {
        let objective = UnitObjective::new(problem, &self.calculator);
        let jacobian = UnitJacobian::new(problem, &self.calculator);
        let solver_config = self.config.solver_config();
        match self.config.root_finder {
            RootFinderKind::Newton => NewtonVectorRootFinder::new(solver_config).solve(
                |x| objective.evaluate(x),
                |x| jacobian.evaluate(x),
                guess,
            ),
            RootFinderKind::Broyden => BroydenVectorRootFinder::new(solver_config).solve(
                |x| objective.evaluate(x),
                |x| jacobian.evaluate(x),
                guess,
            ),
        }
    }
}
