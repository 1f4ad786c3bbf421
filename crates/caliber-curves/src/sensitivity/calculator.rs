//! Instrument sensitivities to curve parameters.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::DVector;

use super::ParameterSensitivity;
use crate::calculators::SensitivityCalculator;
use crate::calibration::CurveBuildingBlock;
use crate::curves::{Curve, YieldCurve};
use crate::error::CurveResult;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// Chains zero-rate sensitivities through the curves' parameterizations.
///
/// A point `dV/dr(t)` on a curve contributes `dV/dr(t) · dr(t)/dp` to that
/// curve's own parameters and, for spread and sum curves, to the parameters
/// of the named curves they are built on.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSensitivityCalculator<'a, C> {
    calculator: &'a C,
}

impl<'a, C: SensitivityCalculator> ParameterSensitivityCalculator<'a, C> {
    /// Wraps a curve sensitivity calculator.
    #[must_use]
    pub fn new(calculator: &'a C) -> Self {
        Self { calculator }
    }

    /// Sensitivity to the parameters of the curves in `selected`.
    ///
    /// Every selected curve gets an entry, zero if the instrument does not
    /// depend on it.
    pub fn calculate<'n>(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
        selected: impl IntoIterator<Item = &'n str>,
    ) -> CurveResult<ParameterSensitivity> {
        let totals = self.per_curve(derivative, curves, selected)?;
        let mut result = ParameterSensitivity::new();
        for (name, vector) in totals {
            let currency = curves.currency_of(&name)?;
            result.add_entry(name, currency, vector)?;
        }
        Ok(result)
    }

    /// Sensitivity to every parameter of `layout`, in layout order.
    pub fn row(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
        layout: &CurveBuildingBlock,
    ) -> CurveResult<DVector<f64>> {
        let totals = self.per_curve(derivative, curves, layout.names())?;
        let mut row = DVector::zeros(layout.total_length());
        for entry in layout.entries() {
            if let Some(vector) = totals.get(&entry.name) {
                row.rows_mut(entry.start, entry.length).copy_from(vector);
            }
        }
        Ok(row)
    }

    /// Names of the curves the instrument depends on, directly or through
    /// the curves a spread or sum curve is built on.
    pub fn dependencies(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
    ) -> CurveResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for (name, _) in self.calculator.sensitivity(derivative, curves)?.iter() {
            collect_names(name, curves.curve(name)?, &mut names);
        }
        Ok(names)
    }

    fn per_curve<'n>(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
        selected: impl IntoIterator<Item = &'n str>,
    ) -> CurveResult<BTreeMap<String, DVector<f64>>> {
        let mut totals = BTreeMap::new();
        for name in selected {
            let count = curves.curve(name)?.parameter_count();
            totals.insert(name.to_string(), DVector::zeros(count));
        }

        let node_sensitivity = self.calculator.sensitivity(derivative, curves)?;
        for (name, points) in node_sensitivity.iter() {
            let curve = curves.curve(name)?;
            for &(time, value) in points {
                chain(name, curve, time, value, &mut totals);
            }
        }
        Ok(totals)
    }
}

fn chain(
    name: &str,
    curve: &YieldCurve,
    time: f64,
    value: f64,
    totals: &mut BTreeMap<String, DVector<f64>>,
) {
    if let Some(total) = totals.get_mut(name) {
        for (i, d) in curve.parameter_sensitivity(time).into_iter().enumerate() {
            total[i] += value * d;
        }
    }
    for (base_name, base) in curve.underlying_curves() {
        chain(base_name, base, time, value, totals);
    }
}

fn collect_names(name: &str, curve: &YieldCurve, names: &mut BTreeSet<String>) {
    if names.insert(name.to_string()) {
        for (base_name, base) in curve.underlying_curves() {
            collect_names(base_name, base, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::{ParSpreadMarketQuote, ValueCalculator};
    use crate::curves::{InterpolatedCurve, SpreadCurve};
    use crate::instruments::{CashDeposit, FloatingRate, ForwardRateAgreement};
    use crate::interpolation::InterpolationMethod;
    use caliber_core::{Currency, FxMatrix};
    use std::sync::Arc;

    fn base(rates: &[f64]) -> YieldCurve {
        InterpolatedCurve::new(&[0.5, 1.0, 2.0], rates, InterpolationMethod::Linear, None)
            .unwrap()
            .into()
    }

    fn provider(base_rates: &[f64], spread_rates: &[f64]) -> CurveProvider {
        let base = Arc::new(base(base_rates));
        let spread = InterpolatedCurve::new(
            &[1.0, 2.0],
            spread_rates,
            InterpolationMethod::Linear,
            None,
        )
        .unwrap();
        CurveProvider::new(FxMatrix::default())
            .with_shared_curve("Base", Arc::clone(&base), Currency::USD)
            .unwrap()
            .with_curve(
                "Spread",
                YieldCurve::Spread(SpreadCurve::new("Base", base, spread.into())),
                Currency::USD,
            )
            .unwrap()
    }

    fn fra() -> InstrumentDerivative {
        InstrumentDerivative::ForwardRateAgreement(ForwardRateAgreement {
            currency: Currency::USD,
            discounting_curve: "Base".to_string(),
            payment_time: 1.75,
            accrual: 0.5,
            notional: 1.0,
            fixed_rate: 0.02,
            rate: FloatingRate::Projected {
                forward_curve: "Spread".to_string(),
                start_time: 1.25,
                end_time: 1.75,
                accrual: 0.5,
                accrued_factor: 1.0,
            },
        })
    }

    #[test]
    fn test_spread_curve_chains_to_base() {
        let base_rates = [0.01, 0.012, 0.015];
        let spread_rates = [0.001, 0.002];
        let curves = provider(&base_rates, &spread_rates);
        let calculator = ParameterSensitivityCalculator::new(&ParSpreadMarketQuote);
        let sensitivity = calculator
            .calculate(&fra(), &curves, ["Base", "Spread"])
            .unwrap();

        let value = ParSpreadMarketQuote.value(&fra(), &curves).unwrap();
        let bump = 1e-7;
        for j in 0..3 {
            let mut bumped = base_rates;
            bumped[j] += bump;
            let numeric = (ParSpreadMarketQuote
                .value(&fra(), &provider(&bumped, &spread_rates))
                .unwrap()
                - value)
                / bump;
            let analytic = sensitivity.get("Base", Currency::USD).unwrap()[j];
            assert!((numeric - analytic).abs() < 1e-5, "base {j}: {numeric} vs {analytic}");
        }
        for j in 0..2 {
            let mut bumped = spread_rates;
            bumped[j] += bump;
            let numeric = (ParSpreadMarketQuote
                .value(&fra(), &provider(&base_rates, &bumped))
                .unwrap()
                - value)
                / bump;
            let analytic = sensitivity.get("Spread", Currency::USD).unwrap()[j];
            assert!((numeric - analytic).abs() < 1e-5, "spread {j}: {numeric} vs {analytic}");
        }
    }

    #[test]
    fn test_row_follows_layout() {
        let curves = provider(&[0.01, 0.012, 0.015], &[0.001, 0.002]);
        let calculator = ParameterSensitivityCalculator::new(&ParSpreadMarketQuote);
        let layout = CurveBuildingBlock::from_lengths([("Spread", 2), ("Base", 3)]).unwrap();
        let row = calculator.row(&fra(), &curves, &layout).unwrap();
        let by_curve = calculator
            .calculate(&fra(), &curves, ["Base", "Spread"])
            .unwrap();
        let spread = by_curve.get("Spread", Currency::USD).unwrap();
        let base = by_curve.get("Base", Currency::USD).unwrap();
        assert_eq!(row.rows(0, 2).into_owned(), *spread);
        assert_eq!(row.rows(2, 3).into_owned(), *base);
    }

    #[test]
    fn test_dependencies_follow_base_curves() {
        let curves = provider(&[0.01, 0.012, 0.015], &[0.001, 0.002]);
        let calculator = ParameterSensitivityCalculator::new(&ParSpreadMarketQuote);
        let names = calculator.dependencies(&fra(), &curves).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), ["Base", "Spread"]);

        let deposit = InstrumentDerivative::Deposit(CashDeposit {
            currency: Currency::USD,
            curve: "Base".to_string(),
            start_time: 0.0,
            end_time: 1.0,
            accrual: 1.0,
            notional: 1.0,
            rate: 0.01,
        });
        let names = calculator.dependencies(&deposit, &curves).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), ["Base"]);
    }
}
