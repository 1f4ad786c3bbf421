//! Parameter and market-quote sensitivities.
//!
//! - [`ParameterSensitivity`]: the additive accumulator keyed by curve name
//!   and currency
//! - [`ParameterSensitivityCalculator`]: instrument to curve parameters
//! - [`MarketQuoteSensitivityCalculator`]: instrument to calibrating quotes,
//!   through the building-block bundle of a calibration

mod calculator;
mod market_quote;
mod parameter;

pub use calculator::ParameterSensitivityCalculator;
pub use market_quote::MarketQuoteSensitivityCalculator;
pub use parameter::{ParameterSensitivity, SensitivityKey};
