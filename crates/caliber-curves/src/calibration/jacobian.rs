//! Jacobian assembly, inversion and slicing.

use caliber_math::linear_algebra::invert;
use caliber_math::MathError;
use nalgebra::DMatrix;

use super::layout::CurveBuildingBlock;
use crate::calculators::SensitivityCalculator;
use crate::error::{CurveError, CurveResult};
use crate::instruments::InstrumentDerivative;
use crate::provider::CurveProvider;
use crate::sensitivity::ParameterSensitivityCalculator;

/// `d value_i / d p_j` for instruments `i` against the parameters of
/// `layout`, one row per instrument.
pub fn cumulative_jacobian<C: SensitivityCalculator>(
    calculator: &C,
    instruments: &[InstrumentDerivative],
    curves: &CurveProvider,
    layout: &CurveBuildingBlock,
) -> CurveResult<DMatrix<f64>> {
    let parameter = ParameterSensitivityCalculator::new(calculator);
    let mut jacobian = DMatrix::zeros(instruments.len(), layout.total_length());
    for (i, derivative) in instruments.iter().enumerate() {
        let row = parameter.row(derivative, curves, layout)?;
        jacobian.row_mut(i).tr_copy_from(&row);
    }
    Ok(jacobian)
}

/// Inverts a calibration Jacobian.
///
/// # Errors
///
/// `SingularJacobian` when the matrix is singular or too ill-conditioned,
/// `LengthMismatch` when it is not square.
pub fn invert_jacobian(jacobian: &DMatrix<f64>) -> CurveResult<DMatrix<f64>> {
    if !jacobian.is_square() {
        return Err(CurveError::length_mismatch(
            "calibration Jacobian columns",
            jacobian.nrows(),
            jacobian.ncols(),
        ));
    }
    invert(jacobian).map_err(|err| match err {
        MathError::SingularMatrix { size, reason } => CurveError::singular_jacobian(size, reason),
        other => other.into(),
    })
}

/// The rows of `inverse` belonging to curve `name`.
pub fn curve_rows(
    inverse: &DMatrix<f64>,
    layout: &CurveBuildingBlock,
    name: &str,
) -> CurveResult<DMatrix<f64>> {
    let entry = layout.entry(name)?;
    if inverse.nrows() != layout.total_length() {
        return Err(CurveError::length_mismatch(
            "inverse Jacobian rows",
            layout.total_length(),
            inverse.nrows(),
        ));
    }
    Ok(inverse.rows(entry.start, entry.length).into_owned())
}
