//! Instrument economics before curve binding.

use caliber_core::calendars::{Calendar, WeekendCalendar};
use caliber_core::daycounts::{DayCount, DayCountConvention};
use caliber_core::{Currency, Date};
use serde::{Deserialize, Serialize};

use super::conventions::{IborIndex, OvernightIndex};
use super::derivative::{
    Bill, CashDeposit, FixedCoupon, FloatingCoupon, FloatingRate, ForwardRateAgreement,
    InstrumentDerivative, Swap,
};
use super::fixings::FixingStore;
use super::names::CurveNameMap;
use crate::error::{CurveError, CurveResult};

/// Curve time of a date: ACT/365F from the valuation date.
pub(crate) fn time_from(valuation: Date, date: Date) -> f64 {
    DayCountConvention::Act365Fixed.year_fraction(valuation, date)
}

/// A fixed-rate cash deposit, valued on the discounting curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositDefinition {
    /// Currency.
    pub currency: Currency,
    /// Start date.
    pub start_date: Date,
    /// End date.
    pub end_date: Date,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Deposit rate.
    pub rate: f64,
}

/// A deposit at a term index rate, valued on the index's forward curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IborDepositDefinition {
    /// Index.
    pub index: IborIndex,
    /// Start date.
    pub start_date: Date,
    /// End date.
    pub end_date: Date,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Deposit rate.
    pub rate: f64,
}

/// Forward rate agreement on a term index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraDefinition {
    /// Index.
    pub index: IborIndex,
    /// Fixing date.
    pub fixing_date: Date,
    /// Accrual start.
    pub start_date: Date,
    /// Accrual end and payment date.
    pub end_date: Date,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Contract rate.
    pub rate: f64,
}

/// A fixed coupon period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCouponDefinition {
    /// Accrual start.
    pub start_date: Date,
    /// Accrual end.
    pub end_date: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
}

/// Index of a floating coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FloatingIndex {
    /// Term rate fixed once per period.
    Ibor(IborIndex),
    /// Overnight rate compounded over the period.
    Overnight(OvernightIndex),
}

impl FloatingIndex {
    /// Index name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            FloatingIndex::Ibor(index) => &index.name,
            FloatingIndex::Overnight(index) => &index.name,
        }
    }
}

/// A floating coupon period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingCouponDefinition {
    /// Index.
    pub index: FloatingIndex,
    /// Accrual start.
    pub start_date: Date,
    /// Accrual end.
    pub end_date: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
}

/// Fixed against floating swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapDefinition {
    /// Currency.
    pub currency: Currency,
    /// Fixed rate.
    pub fixed_rate: f64,
    /// Fixed leg.
    pub fixed_leg: Vec<FixedCouponDefinition>,
    /// Floating leg.
    pub floating_leg: Vec<FloatingCouponDefinition>,
}

/// Discount bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDefinition {
    /// Currency.
    pub currency: Currency,
    /// Settlement date.
    pub settlement_date: Date,
    /// Maturity date.
    pub maturity_date: Date,
    /// Yield accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Simple yield.
    pub yield_rate: f64,
}

/// An instrument with its dates and economics fixed, not yet bound to curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentDefinition {
    /// Fixed-rate deposit.
    Deposit(DepositDefinition),
    /// Term index deposit.
    IborDeposit(IborDepositDefinition),
    /// Forward rate agreement.
    Fra(FraDefinition),
    /// Fixed/floating swap.
    Swap(SwapDefinition),
    /// Discount bill.
    Bill(BillDefinition),
}

impl InstrumentDefinition {
    /// Binds the instrument to curve names at `valuation`.
    ///
    /// Rates whose fixing date has passed are taken from `fixings`; a fixing
    /// on the valuation date is used when present and projected otherwise.
    /// Cash flows paid before the valuation date are dropped.
    ///
    /// # Errors
    ///
    /// `MissingFixing` for an absent past fixing, `Configuration` for a
    /// currency or index without a curve, `InvalidInstrument` for a deposit
    /// or bill that already started.
    pub fn to_derivative(
        &self,
        valuation: Date,
        names: &CurveNameMap,
        fixings: &FixingStore,
    ) -> CurveResult<InstrumentDerivative> {
        let t = |date: Date| time_from(valuation, date);
        match self {
            InstrumentDefinition::Deposit(d) => {
                require_not_started(d.start_date, valuation, "deposit")?;
                Ok(InstrumentDerivative::Deposit(CashDeposit {
                    currency: d.currency,
                    curve: names.discounting_curve(d.currency)?.to_string(),
                    start_time: t(d.start_date),
                    end_time: t(d.end_date),
                    accrual: d.accrual,
                    notional: d.notional,
                    rate: d.rate,
                }))
            }
            InstrumentDefinition::IborDeposit(d) => {
                require_not_started(d.start_date, valuation, "deposit")?;
                Ok(InstrumentDerivative::Deposit(CashDeposit {
                    currency: d.index.currency,
                    curve: names.forward_curve(&d.index.name)?.to_string(),
                    start_time: t(d.start_date),
                    end_time: t(d.end_date),
                    accrual: d.accrual,
                    notional: d.notional,
                    rate: d.rate,
                }))
            }
            InstrumentDefinition::Fra(f) => {
                let rate = ibor_rate(
                    &f.index,
                    f.fixing_date,
                    f.start_date,
                    f.end_date,
                    f.accrual,
                    valuation,
                    names,
                    fixings,
                )?;
                Ok(InstrumentDerivative::ForwardRateAgreement(ForwardRateAgreement {
                    currency: f.index.currency,
                    discounting_curve: names.discounting_curve(f.index.currency)?.to_string(),
                    payment_time: t(f.end_date),
                    accrual: f.accrual,
                    notional: f.notional,
                    fixed_rate: f.rate,
                    rate,
                }))
            }
            InstrumentDefinition::Swap(s) => {
                let fixed_leg = s
                    .fixed_leg
                    .iter()
                    .filter(|c| c.payment_date >= valuation)
                    .map(|c| FixedCoupon {
                        payment_time: t(c.payment_date),
                        accrual: c.accrual,
                        notional: c.notional,
                    })
                    .collect();
                let floating_leg = s
                    .floating_leg
                    .iter()
                    .filter(|c| c.payment_date >= valuation)
                    .map(|c| -> CurveResult<FloatingCoupon> {
                        Ok(FloatingCoupon {
                            payment_time: t(c.payment_date),
                            accrual: c.accrual,
                            notional: c.notional,
                            rate: floating_rate(c, valuation, names, fixings)?,
                        })
                    })
                    .collect::<CurveResult<Vec<_>>>()?;
                Ok(InstrumentDerivative::Swap(Swap {
                    currency: s.currency,
                    discounting_curve: names.discounting_curve(s.currency)?.to_string(),
                    fixed_rate: s.fixed_rate,
                    fixed_leg,
                    floating_leg,
                }))
            }
            InstrumentDefinition::Bill(b) => {
                require_not_started(b.settlement_date, valuation, "bill")?;
                Ok(InstrumentDerivative::Bill(Bill {
                    currency: b.currency,
                    discounting_curve: names.discounting_curve(b.currency)?.to_string(),
                    settlement_time: t(b.settlement_date),
                    maturity_time: t(b.maturity_date),
                    accrual: b.accrual,
                    notional: b.notional,
                    yield_rate: b.yield_rate,
                }))
            }
        }
    }
}

fn require_not_started(start: Date, valuation: Date, what: &str) -> CurveResult<()> {
    if start < valuation {
        return Err(CurveError::invalid_instrument(format!(
            "{what} starting {start} is before the valuation date {valuation}"
        )));
    }
    Ok(())
}

fn missing_fixing(index: &str, date: Date) -> CurveError {
    CurveError::MissingFixing {
        index: index.to_string(),
        date,
    }
}

#[allow(clippy::too_many_arguments)]
fn ibor_rate(
    index: &IborIndex,
    fixing_date: Date,
    start: Date,
    end: Date,
    accrual: f64,
    valuation: Date,
    names: &CurveNameMap,
    fixings: &FixingStore,
) -> CurveResult<FloatingRate> {
    let fixing = fixings.fixing(&index.name, fixing_date);
    if fixing_date < valuation {
        return fixing
            .map(FloatingRate::Fixed)
            .ok_or_else(|| missing_fixing(&index.name, fixing_date));
    }
    if let Some(rate) = fixing.filter(|_| fixing_date == valuation) {
        return Ok(FloatingRate::Fixed(rate));
    }
    Ok(FloatingRate::Projected {
        forward_curve: names.forward_curve(&index.name)?.to_string(),
        start_time: time_from(valuation, start),
        end_time: time_from(valuation, end),
        accrual,
        accrued_factor: 1.0,
    })
}

fn floating_rate(
    coupon: &FloatingCouponDefinition,
    valuation: Date,
    names: &CurveNameMap,
    fixings: &FixingStore,
) -> CurveResult<FloatingRate> {
    match &coupon.index {
        FloatingIndex::Ibor(index) => {
            let end = index.end_date(coupon.start_date)?;
            let accrual = index.day_count.year_fraction(coupon.start_date, end);
            ibor_rate(
                index,
                index.fixing_date(coupon.start_date),
                coupon.start_date,
                end,
                accrual,
                valuation,
                names,
                fixings,
            )
        }
        FloatingIndex::Overnight(index) => {
            overnight_rate(index, coupon, valuation, names, fixings)
        }
    }
}

/// Compounds the overnight fixings published so far and projects the rest.
fn overnight_rate(
    index: &OvernightIndex,
    coupon: &FloatingCouponDefinition,
    valuation: Date,
    names: &CurveNameMap,
    fixings: &FixingStore,
) -> CurveResult<FloatingRate> {
    let mut accrued_factor = 1.0;
    let mut current = coupon.start_date;
    while current < coupon.end_date && current <= valuation {
        let fixing = fixings.fixing(&index.name, current);
        let rate = match fixing {
            Some(rate) => rate,
            None if current == valuation => break,
            None => return Err(missing_fixing(&index.name, current)),
        };
        let next = WeekendCalendar.add_business_days(current, 1).min(coupon.end_date);
        accrued_factor *= 1.0 + rate * index.day_count.year_fraction(current, next);
        current = next;
    }

    if current >= coupon.end_date {
        return Ok(FloatingRate::Fixed((accrued_factor - 1.0) / coupon.accrual));
    }
    Ok(FloatingRate::Projected {
        forward_curve: names.forward_curve(&index.name)?.to_string(),
        start_time: time_from(valuation, current),
        end_time: time_from(valuation, coupon.end_date),
        accrual: coupon.accrual,
        accrued_factor,
    })
}
