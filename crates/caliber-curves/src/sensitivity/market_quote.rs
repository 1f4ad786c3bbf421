//! Instrument sensitivities to the calibrating market quotes.

use super::{ParameterSensitivity, ParameterSensitivityCalculator};
use crate::calculators::SensitivityCalculator;
use crate::calibration::CurveBuildingBlockBundle;
use crate::error::CurveResult;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// Turns parameter sensitivities into quote sensitivities with the
/// inverse Jacobian slices of a calibration.
///
/// For a curve `c` with parameter sensitivity `s_c` and bundle matrix
/// `M_c`, the quote sensitivity is `s_cᵀ M_c`, split back into one entry
/// per calibrated curve using the layout stored with `M_c`.
#[derive(Debug, Clone, Copy)]
pub struct MarketQuoteSensitivityCalculator<'a, C> {
    parameter: ParameterSensitivityCalculator<'a, C>,
    bundle: &'a CurveBuildingBlockBundle,
}

impl<'a, C: SensitivityCalculator> MarketQuoteSensitivityCalculator<'a, C> {
    /// Creates the calculator for a calibration's bundle.
    #[must_use]
    pub fn new(calculator: &'a C, bundle: &'a CurveBuildingBlockBundle) -> Self {
        Self {
            parameter: ParameterSensitivityCalculator::new(calculator),
            bundle,
        }
    }

    /// Sensitivity to the quotes of the instruments that built the curves.
    ///
    /// Only calibrated curves the instrument depends on get an entry.
    pub fn calculate(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
    ) -> CurveResult<ParameterSensitivity> {
        let reached = self.parameter.dependencies(derivative, curves)?;
        let calibrated = reached
            .iter()
            .map(String::as_str)
            .filter(|name| self.bundle.contains(name));
        let parameters = self.parameter.calculate(derivative, curves, calibrated)?;
        self.project(&parameters, curves)
    }

    /// Projects an existing parameter sensitivity onto the quotes.
    pub fn project(
        &self,
        parameters: &ParameterSensitivity,
        curves: &CurveProvider,
    ) -> CurveResult<ParameterSensitivity> {
        let mut result = ParameterSensitivity::new();
        for ((name, _), sensitivity) in parameters.iter() {
            let (layout, matrix) = self.bundle.get(name)?;
            let quotes = matrix.tr_mul(sensitivity);
            for entry in layout.entries() {
                result.add_entry(
                    entry.name.clone(),
                    curves.currency_of(&entry.name)?,
                    quotes.rows(entry.start, entry.length).into_owned(),
                )?;
            }
        }
        Ok(result)
    }
}
