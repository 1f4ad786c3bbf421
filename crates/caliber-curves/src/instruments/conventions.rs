//! Market conventions for calibrating instruments.
//!
//! Only weekend calendars are modelled; all conventions adjust dates with
//! [`WeekendCalendar`].

use caliber_core::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
use caliber_core::daycounts::DayCountConvention;
use caliber_core::{Currency, Date, Period};
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;

/// Adjusts a date on the weekend calendar.
pub(crate) fn adjust(date: Date, convention: BusinessDayConvention) -> Date {
    WeekendCalendar.adjust(date, convention)
}

/// A term rate index such as 3M USD LIBOR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IborIndex {
    /// Index name, used to look up fixings and forward curves.
    pub name: String,
    /// Currency.
    pub currency: Currency,
    /// Tenor of the underlying deposit.
    pub tenor: Period,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Business days between fixing and start.
    pub spot_lag: i32,
    /// Adjustment of the deposit end date.
    pub business_day: BusinessDayConvention,
}

impl IborIndex {
    /// 3M USD LIBOR.
    #[must_use]
    pub fn usd_libor_3m() -> Self {
        Self::usd_libor("USDLIBOR3M", Period::months(3))
    }

    /// 6M USD LIBOR.
    #[must_use]
    pub fn usd_libor_6m() -> Self {
        Self::usd_libor("USDLIBOR6M", Period::months(6))
    }

    fn usd_libor(name: &str, tenor: Period) -> Self {
        Self {
            name: name.to_string(),
            currency: Currency::USD,
            tenor,
            day_count: DayCountConvention::Act360,
            spot_lag: 2,
            business_day: BusinessDayConvention::ModifiedFollowing,
        }
    }

    /// Spot date for a trade on `date`.
    #[must_use]
    pub fn spot_date(&self, date: Date) -> Date {
        WeekendCalendar.add_business_days(date, self.spot_lag)
    }

    /// Fixing date of a period starting on `start`.
    #[must_use]
    pub fn fixing_date(&self, start: Date) -> Date {
        WeekendCalendar.add_business_days(start, -self.spot_lag)
    }

    /// End of the index period starting on `start`.
    pub fn end_date(&self, start: Date) -> CurveResult<Date> {
        Ok(adjust(self.tenor.add_to(start)?, self.business_day))
    }
}

/// An overnight index such as Fed Funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvernightIndex {
    /// Index name, used to look up fixings and forward curves.
    pub name: String,
    /// Currency.
    pub currency: Currency,
    /// Accrual day count.
    pub day_count: DayCountConvention,
}

impl OvernightIndex {
    /// Effective Fed Funds.
    #[must_use]
    pub fn usd_fed_funds() -> Self {
        Self {
            name: "FEDFUND".to_string(),
            currency: Currency::USD,
            day_count: DayCountConvention::Act360,
        }
    }
}

/// Overnight (and tomorrow-next) deposits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositConvention {
    /// Currency.
    pub currency: Currency,
    /// Accrual day count.
    pub day_count: DayCountConvention,
}

impl DepositConvention {
    /// USD overnight deposits.
    #[must_use]
    pub fn usd_overnight_deposit() -> Self {
        Self {
            currency: Currency::USD,
            day_count: DayCountConvention::Act360,
        }
    }
}

/// Fixed against compounded overnight swaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OisConvention {
    /// Floating index.
    pub index: OvernightIndex,
    /// Period of both legs.
    pub payment_tenor: Period,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
    /// Business days from trade to start.
    pub spot_lag: i32,
    /// Adjustment of schedule dates.
    pub business_day: BusinessDayConvention,
}

impl OisConvention {
    /// USD Fed Funds OIS with annual payments.
    #[must_use]
    pub fn usd_1y_fed_funds() -> Self {
        Self {
            index: OvernightIndex::usd_fed_funds(),
            payment_tenor: Period::years(1),
            fixed_day_count: DayCountConvention::Act360,
            spot_lag: 2,
            business_day: BusinessDayConvention::ModifiedFollowing,
        }
    }
}

/// Fixed against term-rate swaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIborSwapConvention {
    /// Fixed leg period.
    pub fixed_tenor: Period,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
    /// Floating index; its tenor is the floating leg period.
    pub index: IborIndex,
    /// Adjustment of schedule dates.
    pub business_day: BusinessDayConvention,
}

impl FixedIborSwapConvention {
    /// USD swap, semi-annual 30/360 fixed against 3M LIBOR.
    #[must_use]
    pub fn usd_6m_libor_3m() -> Self {
        Self::usd_6m(IborIndex::usd_libor_3m())
    }

    /// USD swap, semi-annual 30/360 fixed against 6M LIBOR.
    #[must_use]
    pub fn usd_6m_libor_6m() -> Self {
        Self::usd_6m(IborIndex::usd_libor_6m())
    }

    fn usd_6m(index: IborIndex) -> Self {
        Self {
            fixed_tenor: Period::months(6),
            fixed_day_count: DayCountConvention::Thirty360,
            index,
            business_day: BusinessDayConvention::ModifiedFollowing,
        }
    }
}

/// Discount bills quoted by simple yield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillConvention {
    /// Currency.
    pub currency: Currency,
    /// Yield day count.
    pub day_count: DayCountConvention,
    /// Business days from trade to settlement.
    pub settlement_lag: i32,
    /// Adjustment of the maturity date.
    pub business_day: BusinessDayConvention,
}

impl BillConvention {
    /// US Treasury bills.
    #[must_use]
    pub fn us_treasury_bill() -> Self {
        Self {
            currency: Currency::USD,
            day_count: DayCountConvention::Act360,
            settlement_lag: 1,
            business_day: BusinessDayConvention::Following,
        }
    }
}
