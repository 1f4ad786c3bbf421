//! # Caliber Core
//!
//! Core types for the Caliber multi-curve calibration engine.
//!
//! This crate provides the date and convention plumbing that the curve and
//! instrument layers build on:
//!
//! - **Types**: `Date`, `Period`, `Currency` and the `FxMatrix` seed data
//! - **Day Count Conventions**: year fractions for accrual and curve time
//! - **Business Day Calendars**: weekend calendar and adjustment conventions
//!
//! ## Example
//!
//! ```rust
//! use caliber_core::prelude::*;
//!
//! let valuation = Date::from_ymd(2011, 9, 28).unwrap();
//! let spot = valuation.add_business_days(2);
//! let maturity = "3M".parse::<Period>().unwrap().add_to(spot).unwrap();
//! let tau = DayCountConvention::Act360.year_fraction(spot, maturity);
//! assert!(tau > 0.25);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, Date, FxMatrix, Period, PeriodUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, FxMatrix, Period, PeriodUnit};
