//! Actual/365 Fixed day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/365 Fixed day count convention.
///
/// Always uses 365 days as the year basis, regardless of leap years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_act365_leap_year() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(Act365Fixed.day_count(start, end), 366);
        assert_relative_eq!(Act365Fixed.year_fraction(start, end), 366.0 / 365.0);
    }

    #[test]
    fn test_act365_negative() {
        let start = Date::from_ymd(2011, 9, 28).unwrap();
        let end = Date::from_ymd(2011, 9, 27).unwrap();
        assert_relative_eq!(Act365Fixed.year_fraction(start, end), -1.0 / 365.0);
    }
}
