//! USD market shared by the calibration integration tests.
//!
//! Valuation date 2011-09-28: a discounting curve from overnight deposits
//! and Fed Funds OIS, a 3M LIBOR curve from a deposit and swaps, and a 6M
//! LIBOR curve built as a spread over the 3M curve.

#![allow(dead_code)]

use caliber_core::{Currency, Date, FxMatrix, Period};
use caliber_curves::calibration::{
    CalibrationBlock, CalibrationUnit, CurveCalibrationSpec, MarketContext,
};
use caliber_curves::generators::CurveGenerator;
use caliber_curves::instruments::{
    CurveNameMap, DepositConvention, FixedIborSwapConvention, FixingSeries, FixingStore,
    IborIndex, InstrumentGenerator, MarketInstrumentSpec, OisConvention,
};
use caliber_curves::interpolation::InterpolationMethod;
use caliber_curves::provider::CurveProvider;

pub const DSC: &str = "USD Dsc";
pub const FWD3: &str = "USD Fwd 3M";
pub const FWD6: &str = "USD Fwd 6M";

pub const DSC_QUOTES: [f64; 13] = [
    0.0010, 0.0011, 0.0013, 0.0009, 0.0010, 0.0015, 0.0014, 0.0020, 0.0020, 0.0030, 0.0040,
    0.0050, 0.0130,
];
pub const FWD3_QUOTES: [f64; 8] = [
    0.0045, 0.0045, 0.0045, 0.0045, 0.0060, 0.0070, 0.0080, 0.0160,
];
pub const FWD6_QUOTES: [f64; 4] = [0.0065, 0.0055, 0.0080, 0.0170];

pub fn valuation_date() -> Date {
    Date::from_ymd(2011, 9, 28).unwrap()
}

pub fn curve_names() -> CurveNameMap {
    CurveNameMap::new()
        .with_discounting(Currency::USD, DSC)
        .with_forward("FEDFUND", DSC)
        .with_forward("USDLIBOR3M", FWD3)
        .with_forward("USDLIBOR6M", FWD6)
}

/// 3M LIBOR fixings, optionally including today's.
pub fn fixings(with_today: bool) -> FixingStore {
    let series = FixingSeries::new()
        .with_fixing(Date::from_ymd(2011, 9, 27).unwrap(), 0.0035)
        .with_fixing(valuation_date(), 0.0036);
    let series = if with_today {
        series
    } else {
        series.before(valuation_date())
    };
    FixingStore::new().with_series("USDLIBOR3M", series)
}

pub fn market(with_today: bool) -> MarketContext {
    MarketContext::new(valuation_date(), curve_names()).with_fixings(fixings(with_today))
}

pub fn seed() -> CurveProvider {
    CurveProvider::new(FxMatrix::default())
}

pub fn dsc_instruments() -> Vec<MarketInstrumentSpec> {
    let deposit = InstrumentGenerator::OvernightDeposit(DepositConvention::usd_overnight_deposit());
    let ois = InstrumentGenerator::OvernightIndexedSwap(OisConvention::usd_1y_fed_funds());
    let tenors = [
        Period::months(1),
        Period::months(2),
        Period::months(3),
        Period::months(6),
        Period::months(9),
        Period::years(1),
        Period::years(2),
        Period::years(3),
        Period::years(4),
        Period::years(5),
        Period::years(10),
    ];
    let mut instruments = vec![
        MarketInstrumentSpec::new(DSC_QUOTES[0], deposit.clone(), Period::days(0)),
        MarketInstrumentSpec::new(DSC_QUOTES[1], deposit, Period::days(1)),
    ];
    instruments.extend(
        tenors
            .iter()
            .zip(&DSC_QUOTES[2..])
            .map(|(&tenor, &quote)| MarketInstrumentSpec::new(quote, ois.clone(), tenor)),
    );
    instruments
}

pub fn fwd3_instruments() -> Vec<MarketInstrumentSpec> {
    let deposit = InstrumentGenerator::IborDeposit(IborIndex::usd_libor_3m());
    let swap = InstrumentGenerator::FixedIborSwap(FixedIborSwapConvention::usd_6m_libor_3m());
    let tenors = [
        Period::months(6),
        Period::years(1),
        Period::years(2),
        Period::years(3),
        Period::years(5),
        Period::years(7),
        Period::years(10),
    ];
    let mut instruments = vec![MarketInstrumentSpec::new(
        FWD3_QUOTES[0],
        deposit,
        Period::months(0),
    )];
    instruments.extend(
        tenors
            .iter()
            .zip(&FWD3_QUOTES[1..])
            .map(|(&tenor, &quote)| MarketInstrumentSpec::new(quote, swap.clone(), tenor)),
    );
    instruments
}

pub fn fwd6_instruments() -> Vec<MarketInstrumentSpec> {
    let deposit = InstrumentGenerator::IborDeposit(IborIndex::usd_libor_6m());
    let swap = InstrumentGenerator::FixedIborSwap(FixedIborSwapConvention::usd_6m_libor_6m());
    let tenors = [Period::years(2), Period::years(5), Period::years(10)];
    let mut instruments = vec![MarketInstrumentSpec::new(
        FWD6_QUOTES[0],
        deposit,
        Period::months(0),
    )];
    instruments.extend(
        tenors
            .iter()
            .zip(&FWD6_QUOTES[1..])
            .map(|(&tenor, &quote)| MarketInstrumentSpec::new(quote, swap.clone(), tenor)),
    );
    instruments
}

pub fn linear() -> CurveGenerator {
    CurveGenerator::interpolated(InterpolationMethod::Linear)
}

pub fn dsc_curve() -> CurveCalibrationSpec {
    CurveCalibrationSpec::new(DSC, Currency::USD, linear(), dsc_instruments())
}

pub fn fwd3_curve() -> CurveCalibrationSpec {
    CurveCalibrationSpec::new(FWD3, Currency::USD, linear(), fwd3_instruments())
}

pub fn fwd6_curve() -> CurveCalibrationSpec {
    CurveCalibrationSpec::new(
        FWD6,
        Currency::USD,
        CurveGenerator::augmenting(linear(), FWD3),
        fwd6_instruments(),
    )
}

/// Discounting and 3M curves solved jointly.
pub fn two_curve_block() -> CalibrationBlock {
    CalibrationBlock::new(
        "USD Dsc + Fwd 3M",
        vec![CalibrationUnit::new(vec![dsc_curve(), fwd3_curve()])],
    )
}

/// The two-curve unit followed by the 6M spread curve.
pub fn three_curve_block() -> CalibrationBlock {
    CalibrationBlock::new(
        "USD Dsc + Fwd 3M + Fwd 6M",
        vec![
            CalibrationUnit::new(vec![dsc_curve(), fwd3_curve()]),
            CalibrationUnit::new(vec![fwd6_curve()]),
        ],
    )
}

/// Times at which curves are compared across calibrations.
pub const CHECK_TIMES: [f64; 8] = [0.01, 0.25, 0.5, 1.0, 2.0, 5.0, 7.5, 10.0];

/// Installs a test subscriber honoring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
