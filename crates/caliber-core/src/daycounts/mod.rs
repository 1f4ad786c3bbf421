//! Day count conventions.
//!
//! Day count conventions determine how accrual fractions are computed
//! between two dates. Curve time itself is measured with [`Act365Fixed`].
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360 - money market and floating legs
//! - [`Act365Fixed`]: Actual/365 Fixed - curve time
//! - [`Thirty360`]: 30/360 US bond basis - USD fixed swap legs
//!
//! # Usage
//!
//! ```rust
//! use caliber_core::daycounts::{DayCount, Thirty360};
//! use caliber_core::types::Date;
//!
//! let start = Date::from_ymd(2011, 9, 30).unwrap();
//! let end = Date::from_ymd(2012, 3, 30).unwrap();
//! assert_eq!(Thirty360.year_fraction(start, end), 0.5);
//! ```

mod act360;
mod act365;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use thirty360::Thirty360;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` is before `start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime selection of a day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// 30/360 US bond basis
    Thirty360,
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => Act360.name(),
            DayCountConvention::Act365Fixed => Act365Fixed.name(),
            DayCountConvention::Thirty360 => Thirty360.name(),
        }
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Thirty360 => Thirty360.year_fraction(start, end),
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Act360 => Act360.day_count(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.day_count(start, end),
            DayCountConvention::Thirty360 => Thirty360.day_count(start, end),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
