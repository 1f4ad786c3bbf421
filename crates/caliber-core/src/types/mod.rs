//! Domain value types.

mod currency;
mod date;
mod fx;
mod period;

pub use currency::Currency;
pub use date::Date;
pub use fx::FxMatrix;
pub use period::{Period, PeriodUnit};
