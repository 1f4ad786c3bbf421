//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Calendar;
use crate::types::Date;

/// Business day adjustment conventions.
///
/// These conventions specify how to adjust a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment.
    Unadjusted,

    /// Move to the following business day.
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    #[default]
    ModifiedFollowing,

    /// Move to the preceding business day.
    Preceding,
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
        };
        write!(f, "{name}")
    }
}

/// Adjusts a date according to the given business day convention.
pub(crate) fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> Date {
    if calendar.is_business_day(date) {
        return date;
    }

    match convention {
        BusinessDayConvention::Unadjusted => date,
        BusinessDayConvention::Following => following(date, calendar),
        BusinessDayConvention::ModifiedFollowing => {
            let adjusted = following(date, calendar);
            if adjusted.month() != date.month() {
                preceding(date, calendar)
            } else {
                adjusted
            }
        }
        BusinessDayConvention::Preceding => preceding(date, calendar),
    }
}

fn following<C: Calendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(1);
    }
    date
}

fn preceding<C: Calendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(-1);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    #[test]
    fn test_following() {
        let saturday = Date::from_ymd(2011, 10, 29).unwrap();
        let adjusted = WeekendCalendar.adjust(saturday, BusinessDayConvention::Following);
        assert_eq!(adjusted, Date::from_ymd(2011, 10, 31).unwrap());
    }

    #[test]
    fn test_modified_following_stays_in_month() {
        // Saturday 31 December 2011 rolls back to Friday 30th
        let saturday = Date::from_ymd(2011, 12, 31).unwrap();
        let adjusted = WeekendCalendar.adjust(saturday, BusinessDayConvention::ModifiedFollowing);
        assert_eq!(adjusted, Date::from_ymd(2011, 12, 30).unwrap());

        let sunday = Date::from_ymd(2011, 10, 30).unwrap();
        let adjusted = WeekendCalendar.adjust(sunday, BusinessDayConvention::ModifiedFollowing);
        assert_eq!(adjusted, Date::from_ymd(2011, 10, 31).unwrap());
    }

    #[test]
    fn test_preceding_and_unadjusted() {
        let sunday = Date::from_ymd(2011, 10, 2).unwrap();
        assert_eq!(
            WeekendCalendar.adjust(sunday, BusinessDayConvention::Preceding),
            Date::from_ymd(2011, 9, 30).unwrap()
        );
        assert_eq!(
            WeekendCalendar.adjust(sunday, BusinessDayConvention::Unadjusted),
            sunday
        );
    }
}
