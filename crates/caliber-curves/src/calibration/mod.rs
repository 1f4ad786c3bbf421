//! Multi-curve calibration.
//!
//! A [`CalibrationBlock`] is a list of [`CalibrationUnit`]s solved in order.
//! Each unit solves its curves jointly so that every calibrating instrument
//! values to zero under the chosen calculator, with the curves of earlier
//! units (and any seed curves) held fixed. After each unit the Jacobian of
//! all instruments calibrated so far is inverted and sliced per curve into a
//! [`CurveBuildingBlockBundle`], which maps quote moves to parameter moves.
//!
//! The driver threads a [`BlockState`] through the units: curves are only
//! ever added, never replaced, and a failing unit publishes nothing.

mod bundle;
mod config;
mod engine;
mod jacobian;
mod layout;
mod objective;
mod unit;

pub use bundle::CurveBuildingBlockBundle;
pub use config::{CalibrationConfig, RootFinderKind};
pub use engine::{BlockState, CalibrationResult, CurveCalibrator, UnitReport};
pub use jacobian::{cumulative_jacobian, curve_rows, invert_jacobian};
pub use layout::{CurveBuildingBlock, LayoutEntry};
pub use objective::{UnitCurve, UnitJacobian, UnitObjective, UnitProblem};
pub use unit::{CalibrationBlock, CalibrationUnit, CurveCalibrationSpec, MarketContext};
