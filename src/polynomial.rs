extern crate nalgebra as na;

use na::{Complex, Normed};

use crate::error::{ControlError, ControlResult};

/// Imaginary residue tolerated in a coefficient, relative to its magnitude
const CONJUGATE_TOLERANCE: f64 = 1.0e-9;

/// Expand prod_i (s - p_i) in complex arithmetic.
/// Coefficients are lowest degree first: `c[0] + c[1] s + ... + c[n] s^n`.
pub fn poly_from_roots(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for root in roots {
        // Multiply the running product by (s - root)
        let mut next = vec![Complex::new(0.0, 0.0); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i + 1] += *c;
            next[i] -= *c * *root;
        }
        coeffs = next;
    }
    coeffs
}

/// Real coefficients of prod_i (s - p_i).
///
/// Fails with [`ControlError::NonConjugatePoles`] when the roots are not closed
/// under complex conjugation, since the polynomial then has complex coefficients.
pub fn real_poly_from_roots(roots: &[Complex<f64>]) -> ControlResult<Vec<f64>> {
    poly_from_roots(roots)
        .into_iter()
        .map(|c| {
            if c.im.abs() <= CONJUGATE_TOLERANCE * c.norm().max(1.0) {
                Ok(c.re)
            } else {
                Err(ControlError::NonConjugatePoles)
            }
        })
        .collect()
}

/// Evaluate sum_i c_i A^i with Horner's scheme.
pub fn eval_matrix_polynomial<const N: usize>(
    coeffs: &[f64],
    a_matrix: &na::SMatrix<f64, N, N>,
) -> na::SMatrix<f64, N, N> {
    let identity = na::SMatrix::<f64, N, N>::identity();
    coeffs
        .iter()
        .rev()
        .fold(na::SMatrix::<f64, N, N>::zeros(), |acc, c| {
            acc * a_matrix + identity * *c
        })
}
