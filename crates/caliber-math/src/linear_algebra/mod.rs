//! Linear algebra utilities.
//!
//! Dense operations run on `nalgebra` matrices; the tridiagonal solver
//! backs the spline construction.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Reciprocal condition estimate below which a matrix is treated as singular.
pub const MIN_RECIPROCAL_CONDITION: f64 = f64::EPSILON;

/// Solves a tridiagonal system of equations.
///
/// The system has the form:
/// ```text
/// | b[0]  c[0]   0    ...   0   | | x[0]   |   | d[0]   |
/// | a[0]  b[1]  c[1]  ...   0   | | x[1]   |   | d[1]   |
/// |  0    a[1]  b[2]  ...   0   | | x[2]   | = | d[2]   |
/// | ...   ...   ...   ...  ...  | | ...    |   | ...    |
/// ```
///
/// # Arguments
///
/// * `a` - Lower diagonal (length n-1)
/// * `b` - Main diagonal (length n)
/// * `c` - Upper diagonal (length n-1)
/// * `d` - Right-hand side (length n)
pub fn solve_tridiagonal(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> MathResult<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return Ok(vec![]);
    }
    if a.len() != n - 1 || c.len() != n - 1 || d.len() != n {
        return Err(MathError::invalid_input(
            "Tridiagonal system has inconsistent dimensions",
        ));
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if b[0].abs() < 1e-15 {
        return Err(MathError::singular(n, "zero leading diagonal"));
    }
    if n > 1 {
        c_prime[0] = c[0] / b[0];
    }
    d_prime[0] = d[0] / b[0];

    // Forward elimination
    for i in 1..n {
        let denom = b[i] - a[i - 1] * c_prime[i - 1];
        if denom.abs() < 1e-15 {
            return Err(MathError::singular(
                n,
                "zero pivot in tridiagonal elimination",
            ));
        }
        if i < n - 1 {
            c_prime[i] = c[i] / denom;
        }
        d_prime[i] = (d[i] - a[i - 1] * d_prime[i - 1]) / denom;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

fn ensure_square(a: &DMatrix<f64>) -> MathResult<usize> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            n,
            a.ncols()
        )));
    }
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "matrix contains non-finite entries",
        ));
    }
    Ok(n)
}

/// Infinity norm (maximum absolute row sum).
pub fn infinity_norm(a: &DMatrix<f64>) -> f64 {
    a.row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Inverts a square matrix through an LU decomposition with partial pivoting.
///
/// # Errors
///
/// Returns `MathError::SingularMatrix` if a pivot vanishes or the reciprocal
/// condition number `1 / (‖A‖∞ ‖A⁻¹‖∞)` falls below
/// [`MIN_RECIPROCAL_CONDITION`].
pub fn invert(a: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let n = ensure_square(a)?;
    let inverse = a
        .clone()
        .lu()
        .try_inverse()
        .ok_or_else(|| MathError::singular(n, "zero pivot in LU decomposition"))?;

    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(MathError::singular(n, "inverse has non-finite entries"));
    }
    let rcond = 1.0 / (infinity_norm(a) * infinity_norm(&inverse));
    if rcond.is_nan() || rcond < MIN_RECIPROCAL_CONDITION {
        return Err(MathError::singular(
            n,
            format!("reciprocal condition {rcond:.2e} below {MIN_RECIPROCAL_CONDITION:.2e}"),
        ));
    }

    Ok(inverse)
}

/// Solves a linear system Ax = b using LU decomposition.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = ensure_square(a)?;
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    let x = a
        .clone()
        .lu()
        .solve(b)
        .ok_or_else(|| MathError::singular(n, "zero pivot in LU decomposition"))?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::singular(n, "solution has non-finite entries"));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tridiagonal() {
        // 2x + y = 3, x + 2y + z = 4, y + 2z = 3 => x = y = z = 1
        let x = solve_tridiagonal(&[1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0], &[3.0, 4.0, 3.0])
            .unwrap();
        for v in x {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tridiagonal_single_equation() {
        let x = solve_tridiagonal(&[], &[4.0], &[], &[2.0]).unwrap();
        assert_relative_eq!(x[0], 0.5);
        assert!(solve_tridiagonal(&[1.0], &[4.0], &[], &[2.0]).is_err());
    }

    #[test]
    fn test_invert() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = invert(&a).unwrap();
        let identity = &a * &inv;
        assert_relative_eq!(identity[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(identity[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(inv[(0, 0)], 0.6, epsilon = 1e-12);
        assert_relative_eq!(inv[(1, 0)], -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(
            invert(&a),
            Err(MathError::SingularMatrix { size: 2, .. })
        ));

        let zero_row = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            invert(&zero_row),
            Err(MathError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_invert_rejects_non_square() {
        let a = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(invert(&a), Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_solve_linear_system() {
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 4.0]);
        let b = DVector::from_vec(vec![3.0, 5.0, 5.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        let residual = &a * &x - &b;
        assert!(residual.amax() < 1e-12);
    }

    #[test]
    fn test_infinity_norm() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, -2.0, 3.0, 0.5]);
        assert_relative_eq!(infinity_norm(&a), 3.5);
    }
}
