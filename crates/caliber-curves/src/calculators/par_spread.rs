//! Par spread to the market quote.

use super::legs::{
    annuity, annuity_sensitivity, floating_leg_sensitivity, floating_leg_value, forward_rate,
    forward_rate_sensitivity, implied_rate, implied_rate_sensitivity,
};
use super::{MulticurveSensitivity, SensitivityCalculator, ValueCalculator};
use crate::error::CurveResult;
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;

/// The amount to add to the instrument's quote to make it worth zero.
///
/// | instrument | par spread |
/// |------------|------------|
/// | deposit | `(D(s)/D(e) - 1)/τ - K` |
/// | FRA | `F - K` |
/// | swap | `Σ N β F D / Σ N α D - K` |
/// | bill | `(D(s)/D(e) - 1)/τ - y` |
#[derive(Debug, Clone, Copy, Default)]
pub struct ParSpreadMarketQuote;

impl ValueCalculator for ParSpreadMarketQuote {
    fn value(&self, derivative: &InstrumentDerivative, curves: &CurveProvider) -> CurveResult<f64> {
        match derivative {
            InstrumentDerivative::Deposit(d) => {
                Ok(implied_rate(curves, &d.curve, d.start_time, d.end_time, d.accrual)? - d.rate)
            }
            InstrumentDerivative::ForwardRateAgreement(f) => {
                Ok(forward_rate(&f.rate, curves)? - f.fixed_rate)
            }
            InstrumentDerivative::Swap(s) => {
                Ok(floating_leg_value(s, curves)? / annuity(s, curves)? - s.fixed_rate)
            }
            InstrumentDerivative::Bill(b) => Ok(implied_rate(
                curves,
                &b.discounting_curve,
                b.settlement_time,
                b.maturity_time,
                b.accrual,
            )? - b.yield_rate),
        }
    }
}

impl SensitivityCalculator for ParSpreadMarketQuote {
    fn sensitivity(
        &self,
        derivative: &InstrumentDerivative,
        curves: &CurveProvider,
    ) -> CurveResult<MulticurveSensitivity> {
        let mut sensitivity = MulticurveSensitivity::new();
        match derivative {
            InstrumentDerivative::Deposit(d) => implied_rate_sensitivity(
                curves,
                &d.curve,
                d.start_time,
                d.end_time,
                d.accrual,
                1.0,
                &mut sensitivity,
            )?,
            InstrumentDerivative::ForwardRateAgreement(f) => {
                forward_rate_sensitivity(&f.rate, curves, 1.0, &mut sensitivity)?;
            }
            InstrumentDerivative::Swap(s) => {
                let floating = floating_leg_value(s, curves)?;
                let annuity = annuity(s, curves)?;
                floating_leg_sensitivity(s, curves, 1.0 / annuity, &mut sensitivity)?;
                annuity_sensitivity(s, curves, -floating / (annuity * annuity), &mut sensitivity)?;
            }
            InstrumentDerivative::Bill(b) => implied_rate_sensitivity(
                curves,
                &b.discounting_curve,
                b.settlement_time,
                b.maturity_time,
                b.accrual,
                1.0,
                &mut sensitivity,
            )?,
        }
        Ok(sensitivity)
    }
}
