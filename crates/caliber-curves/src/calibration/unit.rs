//! What to calibrate: curves, units, blocks and the market they see.

use caliber_core::{Currency, Date};
use serde::{Deserialize, Serialize};

use crate::generators::CurveGenerator;
use crate::instruments::{CurveNameMap, FixingStore, MarketInstrumentSpec};

/// One curve to calibrate and the instruments that calibrate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveCalibrationSpec {
    /// Curve name.
    pub name: String,
    /// Currency of the curve.
    pub currency: Currency,
    /// Parametrization.
    pub generator: CurveGenerator,
    /// Calibrating instruments, in node order.
    pub instruments: Vec<MarketInstrumentSpec>,
}

impl CurveCalibrationSpec {
    /// Creates a curve specification.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        generator: CurveGenerator,
        instruments: Vec<MarketInstrumentSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            currency,
            generator,
            instruments,
        }
    }
}

/// Curves solved jointly in one root-finding pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationUnit {
    /// Curves in parameter order.
    pub curves: Vec<CurveCalibrationSpec>,
}

impl CalibrationUnit {
    /// Creates a unit.
    #[must_use]
    pub fn new(curves: Vec<CurveCalibrationSpec>) -> Self {
        Self { curves }
    }

    /// Curve names in parameter order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(|c| c.name.as_str())
    }

    /// Number of calibrating instruments.
    #[must_use]
    pub fn instrument_count(&self) -> usize {
        self.curves.iter().map(|c| c.instruments.len()).sum()
    }
}

/// Units bootstrapped in order into one curve set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBlock {
    /// Block name, for diagnostics.
    pub name: String,
    /// Units in calibration order.
    pub units: Vec<CalibrationUnit>,
}

impl CalibrationBlock {
    /// Creates a block.
    #[must_use]
    pub fn new(name: impl Into<String>, units: Vec<CalibrationUnit>) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }
}

/// Valuation date, curve naming and fixings shared by all units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Valuation date.
    pub valuation_date: Date,
    /// Curve used for each currency and index.
    pub curve_names: CurveNameMap,
    /// Historical fixings.
    #[serde(default)]
    pub fixings: FixingStore,
}

impl MarketContext {
    /// Creates a market context without fixings.
    #[must_use]
    pub fn new(valuation_date: Date, curve_names: CurveNameMap) -> Self {
        Self {
            valuation_date,
            curve_names,
            fixings: FixingStore::default(),
        }
    }

    /// Sets the fixings.
    #[must_use]
    pub fn with_fixings(mut self, fixings: FixingStore) -> Self {
        self.fixings = fixings;
        self
    }
}
