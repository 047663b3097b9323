extern crate nalgebra as na;

use na::Complex;
use tracing::debug;

use crate::error::{ControlError, ControlResult};
use crate::linsystheory::{controllability_matrix, numerical_rank};
use crate::polynomial::{eval_matrix_polynomial, real_poly_from_roots};

/// State feedback gain by Ackermann's formula.
///
/// Returns the row K such that the eigenvalues of A - B*K are `desired_poles`:
///
/// K = [0 ... 0 1] * [B, AB, ..., A^(n-1) B]^-1 * phi(A)
///
/// where phi is the desired characteristic polynomial prod_i (s - p_i)
/// evaluated at A. Complex poles must appear in conjugate pairs.
#[allow(non_snake_case)]
pub fn place_poles<const N: usize>(
    A: &na::SMatrix<f64, N, N>,
    B: &na::SMatrix<f64, N, 1>,
    desired_poles: &[Complex<f64>],
) -> ControlResult<na::SMatrix<f64, 1, N>> {
    if N == 0 {
        return Err(ControlError::InvalidConfig(
            "system order must be at least 1".to_owned(),
        ));
    }
    if desired_poles.len() != N {
        return Err(ControlError::PoleCount {
            expected: N,
            actual: desired_poles.len(),
        });
    }

    let ctrb = controllability_matrix(A, B);
    let rank = numerical_rank(&ctrb);
    if rank < N {
        return Err(ControlError::Uncontrollable { rank, order: N });
    }

    let desired_coeffs = real_poly_from_roots(desired_poles)?;
    let phi_A = eval_matrix_polynomial(&desired_coeffs, A);

    let ctrb_inv = ctrb
        .try_inverse()
        .ok_or(ControlError::Uncontrollable { rank, order: N })?;

    let mut selector = na::SMatrix::<f64, 1, N>::zeros();
    selector[N - 1] = 1.0;

    let gain = selector * ctrb_inv * phi_A;
    debug!(?desired_coeffs, gain = ?gain.as_slice(), "placed poles");
    Ok(gain)
}
