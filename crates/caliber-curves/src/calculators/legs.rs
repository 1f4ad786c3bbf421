//! Building blocks shared by the calculators.

use super::MulticurveSensitivity;
use crate::curves::Curve;
use crate::error::CurveResult;
use crate::instruments::{FloatingRate, Swap};
use crate::provider::CurveProvider;

/// Rate of a floating period.
pub(crate) fn forward_rate(rate: &FloatingRate, curves: &CurveProvider) -> CurveResult<f64> {
    match rate {
        FloatingRate::Fixed(value) => Ok(*value),
        FloatingRate::Projected {
            forward_curve,
            start_time,
            end_time,
            accrual,
            accrued_factor,
        } => {
            let curve = curves.curve(forward_curve)?;
            let growth = accrued_factor * curve.discount_factor(*start_time)
                / curve.discount_factor(*end_time);
            Ok((growth - 1.0) / accrual)
        }
    }
}

/// `d rate / d r(t)` of a floating period, scaled by `factor`.
pub(crate) fn forward_rate_sensitivity(
    rate: &FloatingRate,
    curves: &CurveProvider,
    factor: f64,
    into: &mut MulticurveSensitivity,
) -> CurveResult<()> {
    if let FloatingRate::Projected {
        forward_curve,
        start_time,
        end_time,
        accrual,
        accrued_factor,
    } = rate
    {
        let curve = curves.curve(forward_curve)?;
        let growth =
            accrued_factor * curve.discount_factor(*start_time) / curve.discount_factor(*end_time);
        into.add_point(
            forward_curve,
            *start_time,
            -factor * start_time * growth / accrual,
        );
        into.add_point(
            forward_curve,
            *end_time,
            factor * end_time * growth / accrual,
        );
    }
    Ok(())
}

/// Simply compounded rate implied by a curve between two times.
pub(crate) fn implied_rate(
    curves: &CurveProvider,
    curve: &str,
    start: f64,
    end: f64,
    accrual: f64,
) -> CurveResult<f64> {
    curves.forward_rate(curve, start, end, accrual)
}

/// `d implied_rate / d r(t)`, scaled by `factor`.
pub(crate) fn implied_rate_sensitivity(
    curves: &CurveProvider,
    curve: &str,
    start: f64,
    end: f64,
    accrual: f64,
    factor: f64,
    into: &mut MulticurveSensitivity,
) -> CurveResult<()> {
    let growth = curves.discount_factor(curve, start)? / curves.discount_factor(curve, end)?;
    into.add_point(curve, start, -factor * start * growth / accrual);
    into.add_point(curve, end, factor * end * growth / accrual);
    Ok(())
}

/// Fixed leg value per unit of fixed rate: `Σ N α D(t)`.
pub(crate) fn annuity(swap: &Swap, curves: &CurveProvider) -> CurveResult<f64> {
    let curve = curves.curve(&swap.discounting_curve)?;
    Ok(swap
        .fixed_leg
        .iter()
        .map(|c| c.notional * c.accrual * curve.discount_factor(c.payment_time))
        .sum())
}

/// `d annuity / d r(t)`, scaled by `factor`.
pub(crate) fn annuity_sensitivity(
    swap: &Swap,
    curves: &CurveProvider,
    factor: f64,
    into: &mut MulticurveSensitivity,
) -> CurveResult<()> {
    let curve = curves.curve(&swap.discounting_curve)?;
    for c in &swap.fixed_leg {
        let t = c.payment_time;
        let df = curve.discount_factor(t);
        into.add_point(
            &swap.discounting_curve,
            t,
            -factor * t * c.notional * c.accrual * df,
        );
    }
    Ok(())
}

/// Floating leg value: `Σ N β F D(t)`.
pub(crate) fn floating_leg_value(swap: &Swap, curves: &CurveProvider) -> CurveResult<f64> {
    let curve = curves.curve(&swap.discounting_curve)?;
    swap.floating_leg.iter().try_fold(0.0, |total, c| -> CurveResult<f64> {
        let rate = forward_rate(&c.rate, curves)?;
        Ok(total + c.notional * c.accrual * rate * curve.discount_factor(c.payment_time))
    })
}

/// `d floating_leg_value / d r(t)`, scaled by `factor`.
pub(crate) fn floating_leg_sensitivity(
    swap: &Swap,
    curves: &CurveProvider,
    factor: f64,
    into: &mut MulticurveSensitivity,
) -> CurveResult<()> {
    let curve = curves.curve(&swap.discounting_curve)?;
    for c in &swap.floating_leg {
        let t = c.payment_time;
        let df = curve.discount_factor(t);
        let rate = forward_rate(&c.rate, curves)?;
        into.add_point(
            &swap.discounting_curve,
            t,
            -factor * t * c.notional * c.accrual * rate * df,
        );
        forward_rate_sensitivity(&c.rate, curves, factor * c.notional * c.accrual * df, into)?;
    }
    Ok(())
}
