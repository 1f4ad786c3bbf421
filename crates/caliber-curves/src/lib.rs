//! # Caliber Curves
//!
//! Multi-curve interest-rate calibration with building-block sensitivities.
//!
//! This crate provides:
//!
//! - **Curves**: interpolated, constant, sum and spread zero-rate curves that
//!   report how their rates move with their parameters
//! - **Generators**: parametrizations that turn a parameter vector into a
//!   curve, bound to the instruments that calibrate them
//! - **Instruments**: deposits, FRAs, OIS, fixed/IBOR swaps and bills, from
//!   market quotes and conventions down to time-based derivatives
//! - **Calculators**: par spread and present value as calibration targets,
//!   with their zero-rate sensitivities
//! - **Calibration**: sequential units of jointly solved curves, producing a
//!   curve set and a bundle of inverse-Jacobian slices
//! - **Sensitivities**: parameter and market-quote sensitivities
//!
//! ## Calibration flow
//!
//! ```text
//! MarketInstrumentSpec ──generate──> InstrumentDefinition ──bind──> InstrumentDerivative
//!                                                                         │
//! CurveGenerator ──finalize──> ConcreteGenerator ──evaluate(params)──> YieldCurve
//!                                                                         │
//!                  calculator value/sensitivity <── CurveProvider <───────┘
//! ```
//!
//! See [`calibration::CurveCalibrator`] for a complete example.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]

pub mod calculators;
pub mod calibration;
pub mod curves;
pub mod error;
pub mod generators;
pub mod instruments;
pub mod interpolation;
pub mod provider;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculators::{
        CalibrationCalculator, MulticurveSensitivity, ParSpreadMarketQuote, PresentValue,
        SensitivityCalculator, ValueCalculator,
    };
    pub use crate::calibration::{
        CalibrationBlock, CalibrationConfig, CalibrationResult, CalibrationUnit,
        CurveBuildingBlock, CurveBuildingBlockBundle, CurveCalibrationSpec, CurveCalibrator,
        MarketContext, RootFinderKind,
    };
    pub use crate::curves::{Curve, YieldCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::generators::CurveGenerator;
    pub use crate::instruments::{
        CurveNameMap, FixingSeries, FixingStore, InstrumentDerivative, InstrumentGenerator,
        MarketInstrumentSpec,
    };
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::provider::CurveProvider;
    pub use crate::sensitivity::{
        MarketQuoteSensitivityCalculator, ParameterSensitivity, ParameterSensitivityCalculator,
    };
}

pub use error::{CurveError, CurveResult};
