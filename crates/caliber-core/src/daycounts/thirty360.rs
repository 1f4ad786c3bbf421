//! 30/360 US (bond basis) day count convention.

use super::DayCount;
use crate::types::Date;

fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

/// 30/360 US day count convention (Bond Basis).
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February AND D1 was last day of February, change D2 to 30
/// 4. If D2 is 31 AND D1 is now >= 30, change D2 to 30
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let start_feb_eom = is_last_day_of_february(start);
        let mut d1 = start.day() as i64;
        let mut d2 = end.day() as i64;

        if start_feb_eom {
            d1 = 30;
        }
        if d1 == 31 {
            d1 = 30;
        }
        if start_feb_eom && is_last_day_of_february(end) {
            d2 = 30;
        }
        if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        let years = i64::from(end.year() - start.year());
        let months = end.month() as i64 - start.month() as i64;
        360 * years + 30 * months + (d2 - d1)
    }
}
