//! Tenors such as `1M`, `10Y` or `0D`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Calendar days.
    Day,
    /// Weeks of seven calendar days.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl PeriodUnit {
    fn suffix(self) -> char {
        match self {
            PeriodUnit::Day => 'D',
            PeriodUnit::Week => 'W',
            PeriodUnit::Month => 'M',
            PeriodUnit::Year => 'Y',
        }
    }
}

/// A tenor expressed as an amount of a calendar unit.
///
/// Serializes as its market string form (`"3M"`).
///
/// # Example
///
/// ```rust
/// use caliber_core::types::{Date, Period};
///
/// let tenor: Period = "6M".parse().unwrap();
/// let start = Date::from_ymd(2011, 9, 30).unwrap();
/// assert_eq!(tenor.add_to(start).unwrap(), Date::from_ymd(2012, 3, 30).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    amount: i32,
    unit: PeriodUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(amount: i32, unit: PeriodUnit) -> Self {
        Self { amount, unit }
    }

    /// A zero-length period.
    pub const ZERO: Period = Period::new(0, PeriodUnit::Day);

    /// Creates a period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, PeriodUnit::Day)
    }

    /// Creates a period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, PeriodUnit::Month)
    }

    /// Creates a period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, PeriodUnit::Year)
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }

    /// Returns the unit.
    #[must_use]
    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// True when the period has zero length.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Length in whole months, for month and year periods only.
    #[must_use]
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            PeriodUnit::Month => Some(self.amount),
            PeriodUnit::Year => Some(self.amount * 12),
            PeriodUnit::Day | PeriodUnit::Week => None,
        }
    }

    /// Returns the period with its amount negated.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self::new(-self.amount, self.unit)
    }

    /// Adds the period to a date without business-day adjustment.
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            PeriodUnit::Day => Ok(date.add_days(i64::from(self.amount))),
            PeriodUnit::Week => Ok(date.add_days(7 * i64::from(self.amount))),
            PeriodUnit::Month => date.add_months(self.amount),
            PeriodUnit::Year => date.add_years(self.amount),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let unit = match chars.next_back().map(|c| c.to_ascii_uppercase()) {
            Some('D') => PeriodUnit::Day,
            Some('W') => PeriodUnit::Week,
            Some('M') => PeriodUnit::Month,
            Some('Y') => PeriodUnit::Year,
            Some(c) => return Err(CoreError::invalid_period(s, format!("unknown unit '{c}'"))),
            None => return Err(CoreError::invalid_period(s, "empty tenor")),
        };
        let amount = chars
            .as_str()
            .parse::<i32>()
            .map_err(|e| CoreError::invalid_period(s, e.to_string()))?;
        Ok(Self::new(amount, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tenors() {
        assert_eq!("0D".parse::<Period>().unwrap(), Period::days(0));
        assert_eq!("1M".parse::<Period>().unwrap(), Period::months(1));
        assert_eq!("10Y".parse::<Period>().unwrap(), Period::years(10));
        assert_eq!(
            "2w".parse::<Period>().unwrap(),
            Period::new(2, PeriodUnit::Week)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
        assert!("M".parse::<Period>().is_err());
        assert!("1.5Y".parse::<Period>().is_err());
    }

    #[test]
    fn test_add_to() {
        let start = Date::from_ymd(2011, 9, 30).unwrap();
        assert_eq!(
            Period::days(1).add_to(start).unwrap(),
            Date::from_ymd(2011, 10, 1).unwrap()
        );
        assert_eq!(
            Period::years(2).add_to(start).unwrap(),
            Date::from_ymd(2013, 9, 30).unwrap()
        );
        assert_eq!(
            Period::months(3).negated().add_to(start).unwrap(),
            Date::from_ymd(2011, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_total_months() {
        assert_eq!(Period::years(2).total_months(), Some(24));
        assert_eq!(Period::months(6).total_months(), Some(6));
        assert_eq!(Period::days(6).total_months(), None);
        assert!(Period::ZERO.is_zero());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Period::months(3)).unwrap();
        assert_eq!(json, "\"3M\"");
        let back: Period = serde_json::from_str("\"10Y\"").unwrap();
        assert_eq!(back, Period::years(10));
        assert!(serde_json::from_str::<Period>("\"10X\"").is_err());
    }
}
