//! Valuation calculators used as calibration targets.
//!
//! A calculator turns an [`InstrumentDerivative`] and a [`CurveProvider`]
//! into a number that calibration drives to zero, and reports how that
//! number moves with the zero rate of every curve it touches. Both
//! provided calculators match exhaustively on the derivative kinds, so a
//! new kind cannot be added without pricing it.

mod legs;
mod multicurve;
mod par_spread;
mod present_value;

pub use multicurve::MulticurveSensitivity;
pub use par_spread::ParSpreadMarketQuote;
pub use present_value::PresentValue;

use crate::error::CurveResult;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// Values an instrument against a set of curves.
pub trait ValueCalculator: Send + Sync {
    /// The value; zero for an instrument at its market quote.
    fn value(&self, derivative: &InstrumentDerivative, curves: &CurveProvider)
        -> CurveResult<f64>;
}

/// Sensitivity of [`ValueCalculator::value`] to curve zero rates.
pub trait SensitivityCalculator: Send + Sync {
    /// `d value / d r(t)` for every curve point the value depends on.
    fn sensitivity(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
    ) -> CurveResult<MulticurveSensitivity>;
}

/// A calculator usable as a calibration target.
pub trait CalibrationCalculator: ValueCalculator + SensitivityCalculator {}

impl<T: ValueCalculator + SensitivityCalculator> CalibrationCalculator for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{Curve, InterpolatedCurve};
    use crate::instruments::{
        CashDeposit, FixedCoupon, FloatingCoupon, FloatingRate, ForwardRateAgreement, Swap,
    };
    use crate::interpolation::InterpolationMethod;
    use caliber_core::{Currency, FxMatrix};

    const BUMP: f64 = 1e-7;

    fn curve(rates: &[f64]) -> InterpolatedCurve {
        InterpolatedCurve::new(
            &[0.25, 1.0, 2.0, 5.0],
            rates,
            InterpolationMethod::Linear,
            None,
        )
        .unwrap()
    }

    fn provider(dsc: &[f64], fwd: &[f64]) -> CurveProvider {
        CurveProvider::new(FxMatrix::default())
            .with_curve("Dsc", curve(dsc).into(), Currency::USD)
            .unwrap()
            .with_curve("Fwd", curve(fwd).into(), Currency::USD)
            .unwrap()
    }

    const DSC: [f64; 4] = [0.010, 0.012, 0.015, 0.020];
    const FWD: [f64; 4] = [0.013, 0.016, 0.019, 0.024];

    fn instruments() -> Vec<InstrumentDerivative> {
        let projected = |start: f64, end: f64| FloatingRate::Projected {
            forward_curve: "Fwd".to_string(),
            start_time: start,
            end_time: end,
            accrual: end - start,
            accrued_factor: 1.0,
        };
        vec![
            InstrumentDerivative::Deposit(CashDeposit {
                currency: Currency::USD,
                curve: "Dsc".to_string(),
                start_time: 0.1,
                end_time: 0.6,
                accrual: 0.5,
                notional: 1.0,
                rate: 0.011,
            }),
            InstrumentDerivative::ForwardRateAgreement(ForwardRateAgreement {
                currency: Currency::USD,
                discounting_curve: "Dsc".to_string(),
                payment_time: 1.5,
                accrual: 0.5,
                notional: 2.0,
                fixed_rate: 0.017,
                rate: projected(1.0, 1.5),
            }),
            InstrumentDerivative::Swap(Swap {
                currency: Currency::USD,
                discounting_curve: "Dsc".to_string(),
                fixed_rate: 0.018,
                fixed_leg: (1..=3)
                    .map(|i| FixedCoupon {
                        payment_time: f64::from(i),
                        accrual: 1.0,
                        notional: 1.0,
                    })
                    .collect(),
                floating_leg: (0..6)
                    .map(|i| {
                        let start = 0.5 * f64::from(i);
                        FloatingCoupon {
                            payment_time: start + 0.5,
                            accrual: 0.5,
                            notional: 1.0,
                            rate: if i == 0 {
                                FloatingRate::Fixed(0.0036)
                            } else {
                                projected(start, start + 0.5)
                            },
                        }
                    })
                    .collect(),
            }),
            InstrumentDerivative::Bill(crate::instruments::Bill {
                currency: Currency::USD,
                discounting_curve: "Dsc".to_string(),
                settlement_time: 0.0,
                maturity_time: 0.75,
                accrual: 0.76,
                notional: 1.0,
                yield_rate: 0.011,
            }),
        ]
    }

    /// Sums `dV/dr(t) · dr(t)/dp_j` and compares it with a bumped revaluation.
    fn check_against_bumps<C: CalibrationCalculator>(calculator: &C) {
        let base = provider(&DSC, &FWD);
        for derivative in instruments() {
            let value = calculator.value(&derivative, &base).unwrap();
            let sensitivity = calculator.sensitivity(&derivative, &base).unwrap();
            for (name, nodes) in [("Dsc", DSC), ("Fwd", FWD)] {
                let curve = base.curve(name).unwrap();
                for j in 0..nodes.len() {
                    let analytic: f64 = sensitivity
                        .get(name)
                        .unwrap_or(&[])
                        .iter()
                        .map(|(t, s)| s * curve.parameter_sensitivity(*t)[j])
                        .sum();
                    let mut bumped = nodes;
                    bumped[j] += BUMP;
                    let curves = if name == "Dsc" {
                        provider(&bumped, &FWD)
                    } else {
                        provider(&DSC, &bumped)
                    };
                    let numeric = (calculator.value(&derivative, &curves).unwrap() - value) / BUMP;
                    assert!(
                        (analytic - numeric).abs() < 1e-5 * (1.0 + numeric.abs()),
                        "{derivative:?} {name}[{j}]: {analytic} vs {numeric}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_par_spread_sensitivity_matches_bumps() {
        check_against_bumps(&ParSpreadMarketQuote);
    }

    #[test]
    fn test_present_value_sensitivity_matches_bumps() {
        check_against_bumps(&PresentValue);
    }

    #[test]
    fn test_par_spread_and_present_value_share_roots() {
        let curves = provider(&DSC, &FWD);
        for derivative in instruments() {
            let spread = ParSpreadMarketQuote.value(&derivative, &curves).unwrap();
            let at_par = match derivative {
                InstrumentDerivative::Deposit(mut d) => {
                    d.rate += spread;
                    InstrumentDerivative::Deposit(d)
                }
                InstrumentDerivative::ForwardRateAgreement(mut f) => {
                    f.fixed_rate += spread;
                    InstrumentDerivative::ForwardRateAgreement(f)
                }
                InstrumentDerivative::Swap(mut s) => {
                    s.fixed_rate += spread;
                    InstrumentDerivative::Swap(s)
                }
                InstrumentDerivative::Bill(mut b) => {
                    b.yield_rate += spread;
                    InstrumentDerivative::Bill(b)
                }
            };
            assert!(ParSpreadMarketQuote.value(&at_par, &curves).unwrap().abs() < 1e-14);
            assert!(PresentValue.value(&at_par, &curves).unwrap().abs() < 1e-14);
        }
    }

    #[test]
    fn test_unknown_curve() {
        let curves = CurveProvider::new(FxMatrix::default());
        let err = PresentValue.value(&instruments()[0], &curves).unwrap_err();
        assert_eq!(err, crate::error::CurveError::unknown_curve("Dsc"));
    }
}
