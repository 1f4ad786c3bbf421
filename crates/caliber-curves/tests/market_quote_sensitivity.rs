//! Market-quote sensitivities through the building-block bundle.

mod common;

use approx::assert_abs_diff_eq;
use caliber_core::{Currency, FxMatrix, Period};
use caliber_curves::calculators::{ParSpreadMarketQuote, PresentValue, ValueCalculator};
use caliber_curves::calibration::{
    CalibrationBlock, CalibrationConfig, CalibrationResult, CurveCalibrator,
};
use caliber_curves::instruments::{
    FixedIborSwapConvention, InstrumentDerivative, InstrumentGenerator, MarketInstrumentSpec,
};
use caliber_curves::sensitivity::{MarketQuoteSensitivityCalculator, ParameterSensitivityCalculator};
use common::*;

fn calibrate(block: &CalibrationBlock) -> CalibrationResult {
    init_tracing();
    CurveCalibrator::new(CalibrationConfig::default(), ParSpreadMarketQuote)
        .unwrap()
        .calibrate_block(block, &market(true), seed())
        .unwrap()
}

fn derivative(spec: &MarketInstrumentSpec) -> InstrumentDerivative {
    let market = market(true);
    spec.to_derivative(market.valuation_date, &market.curve_names, &market.fixings)
        .unwrap()
}

fn fwd3_swap(tenor: Period, quote: f64) -> MarketInstrumentSpec {
    MarketInstrumentSpec::new(
        quote,
        InstrumentGenerator::FixedIborSwap(FixedIborSwapConvention::usd_6m_libor_3m()),
        tenor,
    )
}

#[test]
fn test_calibrating_swap_is_sensitive_to_its_own_quote_only() {
    let result = calibrate(&three_curve_block());
    let calculator = MarketQuoteSensitivityCalculator::new(&ParSpreadMarketQuote, &result.bundle);

    // 5Y swap of the 3M curve
    let swap = derivative(&fwd3_instruments()[5]);
    let sensitivity = calculator.calculate(&swap, &result.curves).unwrap();
    let dsc = sensitivity.get(DSC, Currency::USD).unwrap();
    let fwd3 = sensitivity.get(FWD3, Currency::USD).unwrap();
    assert_eq!(dsc.len(), 13);
    assert_eq!(fwd3.len(), 8);
    for i in 0..13 {
        assert_abs_diff_eq!(dsc[i], 0.0, epsilon = 1e-8);
    }
    for i in 0..8 {
        assert_abs_diff_eq!(fwd3[i], if i == 5 { 1.0 } else { 0.0 }, epsilon = 1e-8);
    }
    // the 6M curve was built after, so the swap does not see its quotes
    assert!(sensitivity.get(FWD6, Currency::USD).is_none());
}

#[test]
fn test_spread_curve_swap_chains_through_its_base() {
    let result = calibrate(&three_curve_block());
    let calculator = MarketQuoteSensitivityCalculator::new(&ParSpreadMarketQuote, &result.bundle);

    // 10Y swap of the 6M curve depends on all three curves
    let swap = derivative(&fwd6_instruments()[3]);
    let parameters = ParameterSensitivityCalculator::new(&ParSpreadMarketQuote)
        .calculate(&swap, &result.curves, [DSC, FWD3, FWD6])
        .unwrap();
    assert!(parameters.get(FWD3, Currency::USD).unwrap().amax() > 1e-3);

    let sensitivity = calculator.calculate(&swap, &result.curves).unwrap();
    let fwd6 = sensitivity.get(FWD6, Currency::USD).unwrap();
    for i in 0..4 {
        assert_abs_diff_eq!(fwd6[i], if i == 3 { 1.0 } else { 0.0 }, epsilon = 1e-8);
    }
    for name in [DSC, FWD3] {
        let entry = sensitivity.get(name, Currency::USD).unwrap();
        assert_abs_diff_eq!(entry.amax(), 0.0, epsilon = 1e-8);
    }
}

#[test]
fn test_off_market_swap_matches_bump_and_recalibrate() {
    let block = two_curve_block();
    let result = calibrate(&block);
    let calculator = MarketQuoteSensitivityCalculator::new(&ParSpreadMarketQuote, &result.bundle);

    // 4Y is not a calibrating tenor
    let swap = derivative(&fwd3_swap(Period::years(4), 0.0));
    let sensitivity = calculator.calculate(&swap, &result.curves).unwrap();
    let base = ParSpreadMarketQuote.value(&swap, &result.curves).unwrap();

    let bump = 1e-5;
    let bumped_value = |curve: usize, index: usize| {
        let mut bumped = block.clone();
        bumped.units[0].curves[curve].instruments[index].quote += bump;
        let curves = calibrate(&bumped).curves;
        ParSpreadMarketQuote.value(&swap, &curves).unwrap()
    };

    // 5Y discounting OIS and the 3Y and 5Y 3M swaps
    let cases = [(0, DSC, 11), (1, FWD3, 4), (1, FWD3, 5)];
    for (curve, name, index) in cases {
        let numeric = (bumped_value(curve, index) - base) / bump;
        let analytic = sensitivity.get(name, Currency::USD).unwrap()[index];
        assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-4);
    }
    // interpolated between the 3Y and 5Y swaps
    let fwd3 = sensitivity.get(FWD3, Currency::USD).unwrap();
    assert!(fwd3[4] > 0.1 && fwd3[5] > 0.1);
}

#[test]
fn test_present_value_sensitivity_in_another_currency() {
    let result = calibrate(&two_curve_block());
    let calculator = MarketQuoteSensitivityCalculator::new(&PresentValue, &result.bundle);
    let swap = derivative(&fwd3_swap(Period::years(4), 0.01).with_notional(1_000_000.0));
    let usd = calculator.calculate(&swap, &result.curves).unwrap();
    assert_eq!(usd.len(), 2);

    let fx = FxMatrix::new(Currency::USD)
        .add_currency(Currency::EUR, 0.75)
        .unwrap();
    let eur = usd.converted(&fx, Currency::EUR).unwrap();
    assert_eq!(eur.len(), 2);
    assert!(eur.get(DSC, Currency::EUR).is_some());
    assert_abs_diff_eq!(eur.total(), 0.75 * usd.total(), epsilon = 1e-6);
}
