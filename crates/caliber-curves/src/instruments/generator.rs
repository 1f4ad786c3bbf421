//! Instrument generators: market quote and tenor to instrument definition.

use caliber_core::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use caliber_core::daycounts::DayCount;
use caliber_core::{Date, Period, PeriodUnit};
use serde::{Deserialize, Serialize};

use super::conventions::{
    adjust, BillConvention, DepositConvention, FixedIborSwapConvention, IborIndex, OisConvention,
};
use super::definition::{
    BillDefinition, DepositDefinition, FixedCouponDefinition, FloatingCouponDefinition,
    FloatingIndex, FraDefinition, IborDepositDefinition, InstrumentDefinition, SwapDefinition,
};
use crate::error::{CurveError, CurveResult};

/// Builds instrument definitions of one family from quotes.
///
/// The meaning of the tenor depends on the family:
///
/// | family | tenor |
/// |--------|-------|
/// | `OvernightDeposit` | business days from today to the start (`0D` overnight, `1D` tom-next) |
/// | `IborDeposit` | offset of the start from spot; the length is the index tenor |
/// | `Fra` | end of the period from spot; the start is one index tenor earlier |
/// | `OvernightIndexedSwap`, `FixedIborSwap` | maturity from the (offset) spot start |
/// | `Bill` | maturity from settlement |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentGenerator {
    /// One business day deposits.
    OvernightDeposit(DepositConvention),
    /// Deposits at a term index rate.
    IborDeposit(IborIndex),
    /// Forward rate agreements.
    Fra(IborIndex),
    /// Overnight indexed swaps.
    OvernightIndexedSwap(OisConvention),
    /// Fixed against term-rate swaps.
    FixedIborSwap(FixedIborSwapConvention),
    /// Discount bills.
    Bill(BillConvention),
}

impl InstrumentGenerator {
    /// Family name for diagnostics.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            InstrumentGenerator::OvernightDeposit(_) => "overnight deposit",
            InstrumentGenerator::IborDeposit(_) => "ibor deposit",
            InstrumentGenerator::Fra(_) => "FRA",
            InstrumentGenerator::OvernightIndexedSwap(_) => "OIS",
            InstrumentGenerator::FixedIborSwap(_) => "fixed/ibor swap",
            InstrumentGenerator::Bill(_) => "bill",
        }
    }

    /// Creates the definition quoted at `quote` for `tenor`.
    ///
    /// `start_offset` delays the start of swaps from spot (forward starting
    /// swaps) and is rejected by the other families.
    pub fn generate(
        &self,
        valuation: Date,
        tenor: Period,
        quote: f64,
        notional: f64,
        start_offset: Option<Period>,
    ) -> CurveResult<InstrumentDefinition> {
        let today = WeekendCalendar.adjust(valuation, BusinessDayConvention::Following);
        if start_offset.is_some()
            && !matches!(
                self,
                InstrumentGenerator::OvernightIndexedSwap(_) | InstrumentGenerator::FixedIborSwap(_)
            )
        {
            return Err(CurveError::invalid_instrument(format!(
                "{} does not take a start offset",
                self.family()
            )));
        }

        match self {
            InstrumentGenerator::OvernightDeposit(convention) => {
                if tenor.unit() != PeriodUnit::Day || tenor.amount() < 0 {
                    return Err(CurveError::invalid_instrument(format!(
                        "overnight deposit tenor must be business days, got {tenor}"
                    )));
                }
                let start = WeekendCalendar.add_business_days(today, tenor.amount());
                let end = WeekendCalendar.add_business_days(start, 1);
                Ok(InstrumentDefinition::Deposit(DepositDefinition {
                    currency: convention.currency,
                    start_date: start,
                    end_date: end,
                    accrual: convention.day_count.year_fraction(start, end),
                    notional,
                    rate: quote,
                }))
            }
            InstrumentGenerator::IborDeposit(index) => {
                let start = adjust(tenor.add_to(index.spot_date(today))?, index.business_day);
                let end = index.end_date(start)?;
                Ok(InstrumentDefinition::IborDeposit(IborDepositDefinition {
                    index: index.clone(),
                    start_date: start,
                    end_date: end,
                    accrual: index.day_count.year_fraction(start, end),
                    notional,
                    rate: quote,
                }))
            }
            InstrumentGenerator::Fra(index) => {
                let spot = index.spot_date(today);
                let unadjusted_end = tenor.add_to(spot)?;
                let start = adjust(
                    index.tenor.negated().add_to(unadjusted_end)?,
                    index.business_day,
                );
                if start < spot {
                    return Err(CurveError::invalid_instrument(format!(
                        "FRA ending {tenor} after spot is shorter than its {} index",
                        index.tenor
                    )));
                }
                let end = adjust(unadjusted_end, index.business_day);
                Ok(InstrumentDefinition::Fra(FraDefinition {
                    index: index.clone(),
                    fixing_date: index.fixing_date(start),
                    start_date: start,
                    end_date: end,
                    accrual: index.day_count.year_fraction(start, end),
                    notional,
                    rate: quote,
                }))
            }
            InstrumentGenerator::OvernightIndexedSwap(convention) => {
                let spot = WeekendCalendar.add_business_days(today, convention.spot_lag);
                let start = start_offset.unwrap_or(Period::ZERO).add_to(spot)?;
                let maturity = tenor.add_to(start)?;
                let periods = schedule(
                    start,
                    maturity,
                    convention.payment_tenor,
                    convention.business_day,
                )?;
                let index = &convention.index;
                let fixed_leg = fixed_leg(&periods, convention.fixed_day_count, notional);
                let floating_leg = periods
                    .iter()
                    .map(|&(s, e)| FloatingCouponDefinition {
                        index: FloatingIndex::Overnight(index.clone()),
                        start_date: s,
                        end_date: e,
                        payment_date: e,
                        accrual: index.day_count.year_fraction(s, e),
                        notional,
                    })
                    .collect();
                Ok(InstrumentDefinition::Swap(SwapDefinition {
                    currency: index.currency,
                    fixed_rate: quote,
                    fixed_leg,
                    floating_leg,
                }))
            }
            InstrumentGenerator::FixedIborSwap(convention) => {
                let index = &convention.index;
                let start = start_offset
                    .unwrap_or(Period::ZERO)
                    .add_to(index.spot_date(today))?;
                let maturity = tenor.add_to(start)?;
                let fixed_periods = schedule(
                    start,
                    maturity,
                    convention.fixed_tenor,
                    convention.business_day,
                )?;
                let floating_periods =
                    schedule(start, maturity, index.tenor, convention.business_day)?;
                let floating_leg = floating_periods
                    .iter()
                    .map(|&(s, e)| FloatingCouponDefinition {
                        index: FloatingIndex::Ibor(index.clone()),
                        start_date: s,
                        end_date: e,
                        payment_date: e,
                        accrual: index.day_count.year_fraction(s, e),
                        notional,
                    })
                    .collect();
                Ok(InstrumentDefinition::Swap(SwapDefinition {
                    currency: index.currency,
                    fixed_rate: quote,
                    fixed_leg: fixed_leg(&fixed_periods, convention.fixed_day_count, notional),
                    floating_leg,
                }))
            }
            InstrumentGenerator::Bill(convention) => {
                let settlement =
                    WeekendCalendar.add_business_days(today, convention.settlement_lag);
                let maturity = adjust(tenor.add_to(settlement)?, convention.business_day);
                Ok(InstrumentDefinition::Bill(BillDefinition {
                    currency: convention.currency,
                    settlement_date: settlement,
                    maturity_date: maturity,
                    accrual: convention.day_count.year_fraction(settlement, maturity),
                    notional,
                    yield_rate: quote,
                }))
            }
        }
    }
}

fn fixed_leg<D: DayCount>(
    periods: &[(Date, Date)],
    day_count: D,
    notional: f64,
) -> Vec<FixedCouponDefinition> {
    periods
        .iter()
        .map(|&(s, e)| FixedCouponDefinition {
            start_date: s,
            end_date: e,
            payment_date: e,
            accrual: day_count.year_fraction(s, e),
            notional,
        })
        .collect()
}

/// Adjusted accrual periods rolled backward from the unadjusted maturity,
/// with a short first period when the tenor does not divide the term.
fn schedule(
    start: Date,
    maturity: Date,
    period: Period,
    convention: BusinessDayConvention,
) -> CurveResult<Vec<(Date, Date)>> {
    let months = period
        .total_months()
        .filter(|m| *m > 0)
        .ok_or_else(|| {
            CurveError::invalid_instrument(format!("unsupported schedule period {period}"))
        })?;
    if maturity <= start {
        return Err(CurveError::invalid_instrument(format!(
            "maturity {maturity} is not after start {start}"
        )));
    }

    let mut dates = vec![maturity];
    for k in 1.. {
        let date = maturity.add_months(-months * k)?;
        if date <= start {
            break;
        }
        dates.push(date);
    }
    dates.push(start);
    dates.reverse();

    let adjusted: Vec<Date> = dates.into_iter().map(|d| adjust(d, convention)).collect();
    Ok(adjusted.windows(2).map(|w| (w[0], w[1])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caliber_core::daycounts::DayCountConvention;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2011, 9, 28)
    }

    #[test]
    fn test_overnight_and_tom_next() {
        let generator =
            InstrumentGenerator::OvernightDeposit(DepositConvention::usd_overnight_deposit());
        let on = generator.generate(today(), Period::days(0), 0.001, 1.0, None).unwrap();
        let tn = generator.generate(today(), Period::days(1), 0.0011, 1.0, None).unwrap();
        match (on, tn) {
            (InstrumentDefinition::Deposit(on), InstrumentDefinition::Deposit(tn)) => {
                assert_eq!((on.start_date, on.end_date), (today(), date(2011, 9, 29)));
                assert_eq!(
                    (tn.start_date, tn.end_date),
                    (date(2011, 9, 29), date(2011, 9, 30))
                );
                assert_eq!(on.accrual, 1.0 / 360.0);
            }
            other => panic!("unexpected definitions: {other:?}"),
        }
    }

    #[test]
    fn test_fra_dates() {
        let generator = InstrumentGenerator::Fra(IborIndex::usd_libor_3m());
        let InstrumentDefinition::Fra(fra) = generator
            .generate(today(), Period::months(9), 0.004, 1.0, None)
            .unwrap()
        else {
            panic!("expected an FRA");
        };
        assert_eq!(fra.start_date, date(2012, 3, 30));
        assert_eq!(fra.end_date, date(2012, 6, 29));
        assert_eq!(fra.fixing_date, date(2012, 3, 28));

        assert!(generator
            .generate(today(), Period::months(1), 0.004, 1.0, None)
            .is_err());
    }

    #[test]
    fn test_ois_schedule() {
        let generator =
            InstrumentGenerator::OvernightIndexedSwap(OisConvention::usd_1y_fed_funds());
        let InstrumentDefinition::Swap(short) = generator
            .generate(today(), Period::months(1), 0.001, 1.0, None)
            .unwrap()
        else {
            panic!("expected a swap");
        };
        assert_eq!(short.fixed_leg.len(), 1);
        // 2011-10-30 is a Sunday
        assert_eq!(short.fixed_leg[0].payment_date, date(2011, 10, 31));

        let InstrumentDefinition::Swap(long) = generator
            .generate(today(), Period::years(2), 0.002, 1.0, None)
            .unwrap()
        else {
            panic!("expected a swap");
        };
        assert_eq!(long.fixed_leg.len(), 2);
        assert_eq!(long.floating_leg.len(), 2);
        assert_eq!(long.fixed_leg[0].start_date, date(2011, 9, 30));
    }

    #[test]
    fn test_ibor_swap_legs() {
        let generator =
            InstrumentGenerator::FixedIborSwap(FixedIborSwapConvention::usd_6m_libor_3m());
        let InstrumentDefinition::Swap(swap) = generator
            .generate(today(), Period::years(2), 0.006, 1.0, None)
            .unwrap()
        else {
            panic!("expected a swap");
        };
        assert_eq!(swap.fixed_leg.len(), 4);
        assert_eq!(swap.floating_leg.len(), 8);
        let first = &swap.fixed_leg[0];
        assert_eq!(
            first.accrual,
            DayCountConvention::Thirty360.year_fraction(first.start_date, first.end_date)
        );
    }

    #[test]
    fn test_short_front_stub() {
        let periods = schedule(
            date(2011, 9, 30),
            date(2012, 11, 30),
            Period::months(6),
            BusinessDayConvention::ModifiedFollowing,
        )
        .unwrap();
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0], (date(2011, 9, 30), date(2011, 11, 30)));
    }

    #[test]
    fn test_start_offset_only_for_swaps() {
        let generator = InstrumentGenerator::IborDeposit(IborIndex::usd_libor_3m());
        let offset = Some(Period::months(1));
        let result = generator.generate(today(), Period::months(0), 0.004, 1.0, offset);
        assert!(result.is_err());
    }
}
