//! Curve generators: parametrizations mapping a parameter vector to a curve.
//!
//! A [`CurveGenerator`] is the configuration form: it says what kind of
//! curve to build but not where its nodes are. Binding it to the
//! instruments that calibrate it with [`CurveGenerator::finalize`] gives a
//! [`ConcreteGenerator`] with exactly one parameter per instrument, which
//! is what keeps every calibration unit square.
//!
//! # Parameter order
//!
//! Parameters follow instrument order. Additive generators split the
//! parameter vector left to right across their components.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curves::{ConstantCurve, InterpolatedCurve, SpreadCurve, SumCurve, YieldCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::InstrumentDerivative;
use crate::interpolation::InterpolationMethod;
use crate::provider::CurveProvider;

/// The kind of a curve generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    /// Node zero rates, interpolated.
    Interpolated,
    /// Node zero rates with a pinned zero node.
    AnchoredInterpolated,
    /// One flat rate.
    Constant,
    /// Sum of sub-generators.
    Additive,
    /// Spread over an existing curve.
    Augmenting,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::Interpolated => "interpolated",
            GeneratorKind::AnchoredInterpolated => "anchored interpolated",
            GeneratorKind::Constant => "constant",
            GeneratorKind::Additive => "additive",
            GeneratorKind::Augmenting => "augmenting",
        };
        write!(f, "{name}")
    }
}

/// One component of an additive generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveComponent {
    /// The component generator.
    pub generator: CurveGenerator,
    /// Instruments the component is bound to; `None` takes the remainder
    /// and is only allowed for the last component.
    #[serde(default)]
    pub instrument_count: Option<usize>,
}

impl AdditiveComponent {
    /// A component bound to `count` instruments.
    #[must_use]
    pub fn new(generator: CurveGenerator, count: usize) -> Self {
        Self {
            generator,
            instrument_count: Some(count),
        }
    }

    /// A component bound to all remaining instruments.
    #[must_use]
    pub fn remainder(generator: CurveGenerator) -> Self {
        Self {
            generator,
            instrument_count: None,
        }
    }
}

/// Configuration form of a curve parametrization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveGenerator {
    /// Zero rates at the instruments' last payment times.
    Interpolated {
        /// Interpolation method.
        method: InterpolationMethod,
    },
    /// Like `Interpolated`, plus a zero-rate node at `anchor_time` that is
    /// not a parameter.
    AnchoredInterpolated {
        /// Interpolation method.
        method: InterpolationMethod,
        /// Time of the pinned node.
        anchor_time: f64,
    },
    /// A single flat rate.
    Constant,
    /// The sum of the component curves.
    Additive(Vec<AdditiveComponent>),
    /// The curve called `base_curve` plus the curve of `generator`.
    Augmenting {
        /// Generator of the spread.
        generator: Box<CurveGenerator>,
        /// Name of the existing curve to add the spread to.
        base_curve: String,
    },
}

impl CurveGenerator {
    /// Interpolated generator.
    #[must_use]
    pub fn interpolated(method: InterpolationMethod) -> Self {
        CurveGenerator::Interpolated { method }
    }

    /// Spread of `generator` over the curve `base_curve`.
    #[must_use]
    pub fn augmenting(generator: CurveGenerator, base_curve: impl Into<String>) -> Self {
        CurveGenerator::Augmenting {
            generator: Box::new(generator),
            base_curve: base_curve.into(),
        }
    }

    /// The generator kind.
    #[must_use]
    pub fn kind(&self) -> GeneratorKind {
        match self {
            CurveGenerator::Interpolated { .. } => GeneratorKind::Interpolated,
            CurveGenerator::AnchoredInterpolated { .. } => GeneratorKind::AnchoredInterpolated,
            CurveGenerator::Constant => GeneratorKind::Constant,
            CurveGenerator::Additive(_) => GeneratorKind::Additive,
            CurveGenerator::Augmenting { .. } => GeneratorKind::Augmenting,
        }
    }

    /// Parameter count when it does not depend on the instruments.
    #[must_use]
    pub fn fixed_parameter_count(&self) -> Option<usize> {
        match self {
            CurveGenerator::Constant => Some(1),
            CurveGenerator::Interpolated { .. } | CurveGenerator::AnchoredInterpolated { .. } => {
                None
            }
            CurveGenerator::Additive(components) => components
                .iter()
                .map(|c| c.instrument_count.or_else(|| c.generator.fixed_parameter_count()))
                .sum(),
            CurveGenerator::Augmenting { generator, .. } => generator.fixed_parameter_count(),
        }
    }

    /// Binds the generator to the instruments that calibrate it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the instruments cannot give one
    /// parameter each: no instruments, a constant generator with more than
    /// one, node times that do not increase strictly, an anchor on a node,
    /// or additive counts that do not add up.
    pub fn finalize(&self, instruments: &[InstrumentDerivative]) -> CurveResult<ConcreteGenerator> {
        if instruments.is_empty() {
            return Err(CurveError::configuration(format!(
                "{} generator bound to no instruments",
                self.kind()
            )));
        }
        match self {
            CurveGenerator::Interpolated { method } => {
                Ok(ConcreteGenerator::Interpolated {
                    method: *method,
                    node_times: node_times(instruments)?,
                    anchor: None,
                })
            }
            CurveGenerator::AnchoredInterpolated {
                method,
                anchor_time,
            } => {
                let node_times = node_times(instruments)?;
                if node_times.iter().any(|t| t == anchor_time) {
                    return Err(CurveError::configuration(format!(
                        "anchor at {anchor_time} coincides with a node"
                    )));
                }
                Ok(ConcreteGenerator::Interpolated {
                    method: *method,
                    node_times,
                    anchor: Some(*anchor_time),
                })
            }
            CurveGenerator::Constant => {
                if instruments.len() != 1 {
                    return Err(CurveError::configuration(format!(
                        "constant generator needs exactly one instrument, got {}",
                        instruments.len()
                    )));
                }
                Ok(ConcreteGenerator::Constant)
            }
            CurveGenerator::Additive(components) => {
                let counts = component_counts(components, instruments.len())?;
                let mut offset = 0;
                let mut finalized = Vec::with_capacity(components.len());
                for (component, count) in components.iter().zip(counts) {
                    finalized.push(
                        component
                            .generator
                            .finalize(&instruments[offset..offset + count])?,
                    );
                    offset += count;
                }
                Ok(ConcreteGenerator::Additive(finalized))
            }
            CurveGenerator::Augmenting {
                generator,
                base_curve,
            } => Ok(ConcreteGenerator::Augmenting {
                generator: Box::new(generator.finalize(instruments)?),
                base_curve: base_curve.clone(),
            }),
        }
    }
}

fn node_times(instruments: &[InstrumentDerivative]) -> CurveResult<Vec<f64>> {
    let times: Vec<f64> = instruments.iter().map(InstrumentDerivative::last_time).collect();
    if let Some(pair) = times.windows(2).find(|w| w[1] <= w[0]) {
        return Err(CurveError::configuration(format!(
            "curve node times must increase strictly, got {:.6} then {:.6}",
            pair[0], pair[1]
        )));
    }
    Ok(times)
}

/// Number of instruments each additive component is bound to.
fn component_counts(components: &[AdditiveComponent], total: usize) -> CurveResult<Vec<usize>> {
    if components.is_empty() {
        return Err(CurveError::configuration(
            "additive generator without components",
        ));
    }
    let last = components.len() - 1;
    let mut counts = Vec::with_capacity(components.len());
    let mut used = 0;
    for (i, component) in components.iter().enumerate() {
        let count = match component.instrument_count {
            Some(count) => count,
            None if i == last => total.saturating_sub(used),
            None => {
                return Err(CurveError::configuration(
                    "only the last additive component may take the remaining instruments",
                ))
            }
        };
        if count == 0 {
            return Err(CurveError::configuration(format!(
                "additive component {i} is bound to no instruments"
            )));
        }
        used += count;
        counts.push(count);
    }
    if used != total {
        return Err(CurveError::configuration(format!(
            "additive components take {used} instruments, {total} given"
        )));
    }
    Ok(counts)
}

/// A generator bound to its calibrating instruments.
#[derive(Debug, Clone, PartialEq)]
pub enum ConcreteGenerator {
    /// Zero rates at fixed node times.
    Interpolated {
        /// Interpolation method.
        method: InterpolationMethod,
        /// Node times, one per parameter.
        node_times: Vec<f64>,
        /// Pinned zero-rate node.
        anchor: Option<f64>,
    },
    /// One flat rate.
    Constant,
    /// Sum of the component curves.
    Additive(Vec<ConcreteGenerator>),
    /// Spread over a named existing curve.
    Augmenting {
        /// Generator of the spread.
        generator: Box<ConcreteGenerator>,
        /// Name of the base curve.
        base_curve: String,
    },
}

impl ConcreteGenerator {
    /// Number of parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        match self {
            ConcreteGenerator::Interpolated { node_times, .. } => node_times.len(),
            ConcreteGenerator::Constant => 1,
            ConcreteGenerator::Additive(components) => {
                components.iter().map(Self::parameter_count).sum()
            }
            ConcreteGenerator::Augmenting { generator, .. } => generator.parameter_count(),
        }
    }

    /// Names of existing curves the generated curve is built on.
    #[must_use]
    pub fn base_curves(&self) -> Vec<&str> {
        match self {
            ConcreteGenerator::Interpolated { .. } | ConcreteGenerator::Constant => Vec::new(),
            ConcreteGenerator::Additive(components) => {
                components.iter().flat_map(Self::base_curves).collect()
            }
            ConcreteGenerator::Augmenting {
                generator,
                base_curve,
            } => {
                let mut names = vec![base_curve.as_str()];
                names.extend(generator.base_curves());
                names
            }
        }
    }

    /// Starting point for the root finder from the instruments' quotes.
    ///
    /// Quotes are rates close to the zero rates they calibrate, so node
    /// curves start at their quotes. Spreads start at zero, as do all
    /// additive components after the first.
    pub fn initial_guess(&self, quotes: &[f64]) -> CurveResult<Vec<f64>> {
        self.check_length("initial guess quotes", quotes.len())?;
        Ok(match self {
            ConcreteGenerator::Interpolated { .. } => quotes.to_vec(),
            ConcreteGenerator::Constant => vec![quotes[0]],
            ConcreteGenerator::Additive(components) => {
                let mut guess = Vec::with_capacity(quotes.len());
                for (i, component) in components.iter().enumerate() {
                    let n = component.parameter_count();
                    if i == 0 {
                        guess.extend(component.initial_guess(&quotes[..n])?);
                    } else {
                        guess.resize(guess.len() + n, 0.0);
                    }
                }
                guess
            }
            ConcreteGenerator::Augmenting { .. } => vec![0.0; quotes.len()],
        })
    }

    /// Builds the curve for `parameters`.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` for a parameter vector of the wrong length and
    /// `UnknownCurve` when a base curve is missing from `known`.
    pub fn evaluate(&self, parameters: &[f64], known: &CurveProvider) -> CurveResult<YieldCurve> {
        self.check_length("curve parameters", parameters.len())?;
        match self {
            ConcreteGenerator::Interpolated {
                method,
                node_times,
                anchor,
            } => Ok(InterpolatedCurve::new(node_times, parameters, *method, *anchor)?.into()),
            ConcreteGenerator::Constant => Ok(ConstantCurve::new(parameters[0]).into()),
            ConcreteGenerator::Additive(components) => {
                let mut offset = 0;
                let mut curves = Vec::with_capacity(components.len());
                for component in components {
                    let n = component.parameter_count();
                    curves.push(component.evaluate(&parameters[offset..offset + n], known)?);
                    offset += n;
                }
                Ok(YieldCurve::Sum(SumCurve::new(curves)))
            }
            ConcreteGenerator::Augmenting {
                generator,
                base_curve,
            } => {
                let base = known.curve_arc(base_curve)?;
                let spread = generator.evaluate(parameters, known)?;
                Ok(YieldCurve::Spread(SpreadCurve::new(
                    base_curve.clone(),
                    base,
                    spread,
                )))
            }
        }
    }

    fn check_length(&self, context: &str, actual: usize) -> CurveResult<()> {
        let expected = self.parameter_count();
        if actual != expected {
            return Err(CurveError::length_mismatch(context, expected, actual));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::Curve;
    use crate::instruments::CashDeposit;
    use approx::assert_relative_eq;
    use caliber_core::{Currency, FxMatrix};

    fn deposits(ends: &[f64]) -> Vec<InstrumentDerivative> {
        ends.iter()
            .map(|&end| {
                InstrumentDerivative::Deposit(CashDeposit {
                    currency: Currency::USD,
                    curve: "c".to_string(),
                    start_time: 0.0,
                    end_time: end,
                    accrual: end,
                    notional: 1.0,
                    rate: 0.01,
                })
            })
            .collect()
    }

    fn linear() -> CurveGenerator {
        CurveGenerator::interpolated(InterpolationMethod::Linear)
    }

    #[test]
    fn test_interpolated_nodes_at_maturities() {
        let concrete = linear().finalize(&deposits(&[0.5, 1.0, 2.0])).unwrap();
        assert_eq!(concrete.parameter_count(), 3);
        let curve = concrete
            .evaluate(&[0.01, 0.02, 0.03], &CurveProvider::default())
            .unwrap();
        assert_relative_eq!(curve.zero_rate(1.5), 0.025);
        assert_eq!(
            concrete.initial_guess(&[0.1, 0.2, 0.3]).unwrap(),
            vec![0.1, 0.2, 0.3]
        );
    }

    #[test]
    fn test_finalize_errors() {
        assert!(linear().finalize(&[]).unwrap_err().is_configuration());
        assert!(linear()
            .finalize(&deposits(&[1.0, 1.0]))
            .unwrap_err()
            .is_configuration());
        assert!(CurveGenerator::Constant
            .finalize(&deposits(&[1.0, 2.0]))
            .is_err());
        let anchored = CurveGenerator::AnchoredInterpolated {
            method: InterpolationMethod::Linear,
            anchor_time: 1.0,
        };
        assert!(anchored.finalize(&deposits(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn test_anchored_pins_first_node() {
        let anchored = CurveGenerator::AnchoredInterpolated {
            method: InterpolationMethod::Linear,
            anchor_time: 0.0,
        };
        let concrete = anchored.finalize(&deposits(&[1.0, 2.0])).unwrap();
        assert_eq!(concrete.parameter_count(), 2);
        let curve = concrete.evaluate(&[0.02, 0.04], &CurveProvider::default()).unwrap();
        assert_relative_eq!(curve.zero_rate(0.5), 0.01);
    }

    #[test]
    fn test_additive_partition() {
        let additive = CurveGenerator::Additive(vec![
            AdditiveComponent::new(linear(), 2),
            AdditiveComponent::remainder(CurveGenerator::Constant),
        ]);
        assert_eq!(additive.fixed_parameter_count(), Some(3));
        let concrete = additive.finalize(&deposits(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(concrete.parameter_count(), 3);
        assert_eq!(
            concrete.initial_guess(&[0.01, 0.02, 0.03]).unwrap(),
            vec![0.01, 0.02, 0.0]
        );
        let curve = concrete
            .evaluate(&[0.01, 0.02, 0.005], &CurveProvider::default())
            .unwrap();
        assert_relative_eq!(curve.zero_rate(1.5), 0.02);
        assert_eq!(curve.parameter_sensitivity(1.5), vec![0.5, 0.5, 1.0]);

        let mismatched = CurveGenerator::Additive(vec![
            AdditiveComponent::new(linear(), 2),
            AdditiveComponent::new(CurveGenerator::Constant, 1),
        ]);
        assert!(mismatched.finalize(&deposits(&[1.0, 2.0])).is_err());
        let misplaced = CurveGenerator::Additive(vec![
            AdditiveComponent::remainder(linear()),
            AdditiveComponent::new(CurveGenerator::Constant, 1),
        ]);
        assert!(misplaced.finalize(&deposits(&[1.0, 2.0, 3.0])).is_err());
    }

    #[test]
    fn test_augmenting_needs_base() {
        let augmenting = CurveGenerator::augmenting(linear(), "base");
        let concrete = augmenting.finalize(&deposits(&[1.0, 2.0])).unwrap();
        assert_eq!(concrete.base_curves(), vec!["base"]);
        assert_eq!(
            concrete.initial_guess(&[0.01, 0.02]).unwrap(),
            vec![0.0, 0.0]
        );

        let err = concrete
            .evaluate(&[0.001, 0.002], &CurveProvider::default())
            .unwrap_err();
        assert_eq!(err, CurveError::unknown_curve("base"));

        let known = CurveProvider::new(FxMatrix::default())
            .with_curve("base", ConstantCurve::new(0.01).into(), Currency::USD)
            .unwrap();
        let curve = concrete.evaluate(&[0.001, 0.002], &known).unwrap();
        assert_relative_eq!(curve.zero_rate(2.0), 0.012);
        assert_eq!(curve.parameter_count(), 2);
    }

    #[test]
    fn test_wrong_parameter_length() {
        let concrete = linear().finalize(&deposits(&[1.0, 2.0])).unwrap();
        let err = concrete.evaluate(&[0.01], &CurveProvider::default()).unwrap_err();
        assert_eq!(err, CurveError::length_mismatch("curve parameters", 2, 1));
    }

    #[test]
    fn test_generator_from_toml() {
        #[derive(Deserialize)]
        struct Spec {
            generator: CurveGenerator,
        }

        let spec: Spec = toml::from_str(
            r#"
            [generator.Augmenting]
            base_curve = "USD Fwd 3M"
            generator = { Interpolated = { method = "Linear" } }
            "#,
        )
        .unwrap();
        assert_eq!(
            spec.generator,
            CurveGenerator::augmenting(linear(), "USD Fwd 3M")
        );
    }
}
