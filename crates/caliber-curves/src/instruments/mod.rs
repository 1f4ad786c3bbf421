//! Calibrating instruments.
//!
//! Instruments move through three stages:
//!
//! 1. [`MarketInstrumentSpec`]: a quote, an [`InstrumentGenerator`] and a tenor
//! 2. [`InstrumentDefinition`]: dated economics, produced by the generator
//! 3. [`InstrumentDerivative`]: bound to curve names through a
//!    [`CurveNameMap`] and to past fixings, ready for the calculators
//!
//! Derivatives may name curves that do not exist yet; the calibration unit
//! that builds those curves resolves the names.

mod conventions;
mod definition;
mod derivative;
mod fixings;
mod generator;
mod names;

pub use conventions::{
    BillConvention, DepositConvention, FixedIborSwapConvention, IborIndex, OisConvention,
    OvernightIndex,
};
pub use definition::{
    BillDefinition, DepositDefinition, FixedCouponDefinition, FloatingCouponDefinition,
    FloatingIndex, FraDefinition, IborDepositDefinition, InstrumentDefinition, SwapDefinition,
};
pub use derivative::{
    Bill, CashDeposit, FixedCoupon, FloatingCoupon, FloatingRate, ForwardRateAgreement,
    InstrumentDerivative, Swap,
};
pub use fixings::{FixingSeries, FixingStore};
pub use generator::InstrumentGenerator;
pub use names::CurveNameMap;

use caliber_core::{Date, Period};
use serde::{Deserialize, Serialize};

use crate::error::CurveResult;

/// A market quote together with what it is a quote for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInstrumentSpec {
    /// Market quote (a rate).
    pub quote: f64,
    /// Instrument family and conventions.
    pub generator: InstrumentGenerator,
    /// Tenor, interpreted by the generator.
    pub tenor: Period,
    /// Notional.
    #[serde(default = "default_notional")]
    pub notional: f64,
    /// Forward start for swaps.
    #[serde(default)]
    pub start_offset: Option<Period>,
}

fn default_notional() -> f64 {
    1.0
}

impl MarketInstrumentSpec {
    /// A spot-starting instrument with unit notional.
    #[must_use]
    pub fn new(quote: f64, generator: InstrumentGenerator, tenor: Period) -> Self {
        Self {
            quote,
            generator,
            tenor,
            notional: default_notional(),
            start_offset: None,
        }
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Sets the forward start.
    #[must_use]
    pub fn with_start_offset(mut self, start_offset: Period) -> Self {
        self.start_offset = Some(start_offset);
        self
    }

    /// Generates the definition and binds it at `valuation`.
    pub fn to_derivative(
        &self,
        valuation: Date,
        names: &CurveNameMap,
        fixings: &FixingStore,
    ) -> CurveResult<InstrumentDerivative> {
        self.generator
            .generate(
                valuation,
                self.tenor,
                self.quote,
                self.notional,
                self.start_offset,
            )?
            .to_derivative(valuation, names, fixings)
    }
}
