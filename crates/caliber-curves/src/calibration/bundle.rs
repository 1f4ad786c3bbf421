//! The calibration's risk artifact: per-curve inverse Jacobian slices.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::DMatrix;

use super::layout::CurveBuildingBlock;
use crate::error::{CurveError, CurveResult};

/// Curve name to (parameter layout, inverse Jacobian rows).
///
/// The matrix of a curve has one row per curve parameter and one column per
/// instrument of the layout it was calibrated with: it maps quote moves to
/// moves of that curve's parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveBuildingBlockBundle {
    entries: BTreeMap<String, (Arc<CurveBuildingBlock>, DMatrix<f64>)>,
}

impl CurveBuildingBlockBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bundle with one more curve.
    ///
    /// # Errors
    ///
    /// `DuplicateCurve` if the curve is already present, `UnknownCurve` if
    /// the layout does not contain it and `LengthMismatch` if the matrix
    /// shape does not match the layout.
    pub fn with_entry(
        mut self,
        name: impl Into<String>,
        layout: Arc<CurveBuildingBlock>,
        matrix: DMatrix<f64>,
    ) -> CurveResult<Self> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CurveError::DuplicateCurve { name });
        }
        let rows = layout.length(&name)?;
        if matrix.nrows() != rows {
            return Err(CurveError::length_mismatch(
                format!("inverse Jacobian rows of {name}"),
                rows,
                matrix.nrows(),
            ));
        }
        if matrix.ncols() != layout.total_length() {
            return Err(CurveError::length_mismatch(
                format!("inverse Jacobian columns of {name}"),
                layout.total_length(),
                matrix.ncols(),
            ));
        }
        self.entries.insert(name, (layout, matrix));
        Ok(self)
    }

    /// The layout and matrix of a curve.
    pub fn get(&self, name: &str) -> CurveResult<(&CurveBuildingBlock, &DMatrix<f64>)> {
        self.entries
            .get(name)
            .map(|(layout, matrix)| (layout.as_ref(), matrix))
            .ok_or_else(|| CurveError::unknown_curve(name))
    }

    /// Union of two bundles over disjoint curves.
    pub fn merged(self, other: CurveBuildingBlockBundle) -> CurveResult<Self> {
        other
            .entries
            .into_iter()
            .try_fold(self, |bundle, (name, (layout, matrix))| {
                bundle.with_entry(name, layout, matrix)
            })
    }

    /// Curve names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// True if the curve is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the bundle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
