//! Priceable instruments bound to curve names.
//!
//! All times are ACT/365F year fractions from the valuation date. Amounts
//! are signed from the holder's side: a deposit is a loan made, a swap pays
//! fixed and receives floating, an FRA receives the floating rate.

use std::collections::BTreeSet;

use caliber_core::Currency;
use serde::{Deserialize, Serialize};

/// Rate of a floating period: either already fixed or projected from a
/// forward curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FloatingRate {
    /// Projected as `(a · D(s) / D(e) - 1) / accrual` on the forward curve.
    Projected {
        /// Forward curve name.
        forward_curve: String,
        /// Start of the projected period.
        start_time: f64,
        /// End of the projected period.
        end_time: f64,
        /// Accrual factor of the whole rate period.
        accrual: f64,
        /// Growth factor already accrued from past fixings (1 when none).
        accrued_factor: f64,
    },
    /// Known from fixings.
    Fixed(f64),
}

impl FloatingRate {
    /// Forward curve name, if the rate is projected.
    #[must_use]
    pub fn forward_curve(&self) -> Option<&str> {
        match self {
            FloatingRate::Projected { forward_curve, .. } => Some(forward_curve),
            FloatingRate::Fixed(_) => None,
        }
    }
}

/// A fixed-rate loan from `start_time` to `end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashDeposit {
    /// Currency.
    pub currency: Currency,
    /// Curve discounting both cash flows.
    pub curve: String,
    /// Time the notional is lent.
    pub start_time: f64,
    /// Time notional and interest are repaid.
    pub end_time: f64,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Deposit rate.
    pub rate: f64,
}

/// Receives the floating rate against a fixed rate, paid at period end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardRateAgreement {
    /// Currency.
    pub currency: Currency,
    /// Discounting curve.
    pub discounting_curve: String,
    /// Payment time.
    pub payment_time: f64,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Contract rate.
    pub fixed_rate: f64,
    /// Floating rate.
    pub rate: FloatingRate,
}

/// A fixed coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCoupon {
    /// Payment time.
    pub payment_time: f64,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
}

/// A floating coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingCoupon {
    /// Payment time.
    pub payment_time: f64,
    /// Accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Coupon rate.
    pub rate: FloatingRate,
}

/// Pays the fixed leg and receives the floating leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    /// Currency.
    pub currency: Currency,
    /// Discounting curve.
    pub discounting_curve: String,
    /// Fixed rate.
    pub fixed_rate: f64,
    /// Remaining fixed coupons.
    pub fixed_leg: Vec<FixedCoupon>,
    /// Remaining floating coupons.
    pub floating_leg: Vec<FloatingCoupon>,
}

/// A bill bought at settlement for its yield price, repaying the notional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Currency.
    pub currency: Currency,
    /// Discounting curve.
    pub discounting_curve: String,
    /// Settlement time.
    pub settlement_time: f64,
    /// Maturity time.
    pub maturity_time: f64,
    /// Yield accrual factor.
    pub accrual: f64,
    /// Notional.
    pub notional: f64,
    /// Simple yield.
    pub yield_rate: f64,
}

impl Bill {
    /// Price per unit notional, `1 / (1 + y τ)`.
    #[must_use]
    pub fn price(&self) -> f64 {
        1.0 / (1.0 + self.yield_rate * self.accrual)
    }
}

/// An instrument ready to be valued against a curve provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrumentDerivative {
    /// Cash deposit.
    Deposit(CashDeposit),
    /// Forward rate agreement.
    ForwardRateAgreement(ForwardRateAgreement),
    /// Fixed/floating swap.
    Swap(Swap),
    /// Discount bill.
    Bill(Bill),
}

impl InstrumentDerivative {
    /// Time of the last cash flow; calibration places curve nodes here.
    #[must_use]
    pub fn last_time(&self) -> f64 {
        match self {
            InstrumentDerivative::Deposit(d) => d.end_time,
            InstrumentDerivative::ForwardRateAgreement(f) => match &f.rate {
                FloatingRate::Projected { end_time, .. } => end_time.max(f.payment_time),
                FloatingRate::Fixed(_) => f.payment_time,
            },
            InstrumentDerivative::Swap(s) => s
                .fixed_leg
                .iter()
                .map(|c| c.payment_time)
                .chain(s.floating_leg.iter().map(|c| c.payment_time))
                .fold(0.0, f64::max),
            InstrumentDerivative::Bill(b) => b.maturity_time,
        }
    }

    /// Names of every curve the instrument is valued on.
    #[must_use]
    pub fn curve_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        match self {
            InstrumentDerivative::Deposit(d) => {
                names.insert(d.curve.as_str());
            }
            InstrumentDerivative::ForwardRateAgreement(f) => {
                names.insert(f.discounting_curve.as_str());
                names.extend(f.rate.forward_curve());
            }
            InstrumentDerivative::Swap(s) => {
                names.insert(s.discounting_curve.as_str());
                names.extend(s.floating_leg.iter().filter_map(|c| c.rate.forward_curve()));
            }
            InstrumentDerivative::Bill(b) => {
                names.insert(b.discounting_curve.as_str());
            }
        }
        names
    }

    /// Currency of the instrument.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            InstrumentDerivative::Deposit(d) => d.currency,
            InstrumentDerivative::ForwardRateAgreement(f) => f.currency,
            InstrumentDerivative::Swap(s) => s.currency,
            InstrumentDerivative::Bill(b) => b.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap() -> InstrumentDerivative {
        InstrumentDerivative::Swap(Swap {
            currency: Currency::USD,
            discounting_curve: "USD Dsc".to_string(),
            fixed_rate: 0.01,
            fixed_leg: vec![
                FixedCoupon { payment_time: 0.5, accrual: 0.5, notional: 1.0 },
                FixedCoupon { payment_time: 1.0, accrual: 0.5, notional: 1.0 },
            ],
            floating_leg: vec![
                FloatingCoupon {
                    payment_time: 0.5,
                    accrual: 0.5,
                    notional: 1.0,
                    rate: FloatingRate::Fixed(0.0036),
                },
                FloatingCoupon {
                    payment_time: 1.0,
                    accrual: 0.5,
                    notional: 1.0,
                    rate: FloatingRate::Projected {
                        forward_curve: "USD Fwd 6M".to_string(),
                        start_time: 0.5,
                        end_time: 1.0,
                        accrual: 0.5,
                        accrued_factor: 1.0,
                    },
                },
            ],
        })
    }

    #[test]
    fn test_swap_metadata() {
        let swap = swap();
        assert_eq!(swap.last_time(), 1.0);
        assert_eq!(
            swap.curve_names().into_iter().collect::<Vec<_>>(),
            vec!["USD Dsc", "USD Fwd 6M"]
        );
        assert_eq!(swap.currency(), Currency::USD);
    }

    #[test]
    fn test_bill_price() {
        let bill = Bill {
            currency: Currency::USD,
            discounting_curve: "USD Bills".to_string(),
            settlement_time: 0.0,
            maturity_time: 0.5,
            accrual: 0.5,
            notional: 1.0,
            yield_rate: 0.02,
        };
        assert!((bill.price() - 1.0 / 1.01).abs() < 1e-15);
    }
}
