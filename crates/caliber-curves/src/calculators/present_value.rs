//! Present value.

use super::legs::{
    annuity, annuity_sensitivity, floating_leg_sensitivity, floating_leg_value, forward_rate,
    forward_rate_sensitivity,
};
use super::{MulticurveSensitivity, SensitivityCalculator, ValueCalculator};
use crate::curves::Curve;
use crate::error::CurveResult;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// Present value in the instrument currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValue;

impl ValueCalculator for PresentValue {
    fn value(&self, derivative: &InstrumentDerivative, curves: &CurveProvider) -> CurveResult<f64> {
        match derivative {
            InstrumentDerivative::Deposit(d) => {
                let curve = curves.curve(&d.curve)?;
                Ok(d.notional
                    * (-curve.discount_factor(d.start_time)
                        + (1.0 + d.rate * d.accrual) * curve.discount_factor(d.end_time)))
            }
            InstrumentDerivative::ForwardRateAgreement(f) => {
                let df = curves.discount_factor(&f.discounting_curve, f.payment_time)?;
                let rate = forward_rate(&f.rate, curves)?;
                Ok(f.notional * f.accrual * (rate - f.fixed_rate) * df)
            }
            InstrumentDerivative::Swap(s) => {
                Ok(floating_leg_value(s, curves)? - s.fixed_rate * annuity(s, curves)?)
            }
            InstrumentDerivative::Bill(b) => {
                let curve = curves.curve(&b.discounting_curve)?;
                Ok(b.notional
                    * (curve.discount_factor(b.maturity_time)
                        - b.price() * curve.discount_factor(b.settlement_time)))
            }
        }
    }
}

impl SensitivityCalculator for PresentValue {
    fn sensitivity(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
    ) -> CurveResult<MulticurveSensitivity> {
        let mut sensitivity = MulticurveSensitivity::new();
        match derivative {
            InstrumentDerivative::Deposit(d) => {
                let curve = curves.curve(&d.curve)?;
                let (s, e) = (d.start_time, d.end_time);
                sensitivity.add_point(&d.curve, s, d.notional * s * curve.discount_factor(s));
                sensitivity.add_point(
                    &d.curve,
                    e,
                    -d.notional * (1.0 + d.rate * d.accrual) * e * curve.discount_factor(e),
                );
            }
            InstrumentDerivative::ForwardRateAgreement(f) => {
                let t = f.payment_time;
                let df = curves.discount_factor(&f.discounting_curve, t)?;
                let rate = forward_rate(&f.rate, curves)?;
                sensitivity.add_point(
                    &f.discounting_curve,
                    t,
                    -t * f.notional * f.accrual * (rate - f.fixed_rate) * df,
                );
                forward_rate_sensitivity(
                    &f.rate,
                    curves,
                    f.notional * f.accrual * df,
                    &mut sensitivity,
                )?;
            }
            InstrumentDerivative::Swap(s) => {
                floating_leg_sensitivity(s, curves, 1.0, &mut sensitivity)?;
                annuity_sensitivity(s, curves, -s.fixed_rate, &mut sensitivity)?;
            }
            InstrumentDerivative::Bill(b) => {
                let curve = curves.curve(&b.discounting_curve)?;
                let (s, e) = (b.settlement_time, b.maturity_time);
                sensitivity.add_point(
                    &b.discounting_curve,
                    e,
                    -b.notional * e * curve.discount_factor(e),
                );
                sensitivity.add_point(
                    &b.discounting_curve,
                    s,
                    b.notional * b.price() * s * curve.discount_factor(s),
                );
            }
        }
        Ok(sensitivity)
    }
}
