extern crate nalgebra as na;

use na::Complex;

/// Singular values below this fraction of the matrix norm count as zero
pub const RANK_TOLERANCE: f64 = 1.0e-9;

/// Controllability matrix [B, AB, A^2 B, ..., A^(n-1) B] of a single-input pair
#[allow(non_snake_case)]
pub fn controllability_matrix<const N: usize>(
    A: &na::SMatrix<f64, N, N>,
    B: &na::SMatrix<f64, N, 1>,
) -> na::SMatrix<f64, N, N> {
    let mut ctrb = na::SMatrix::<f64, N, N>::zeros();
    let mut column = *B;
    for i in 0..N {
        ctrb.set_column(i, &column);
        column = A * column;
    }
    ctrb
}

/// Rank from the SVD, with a tolerance relative to the Frobenius norm.
/// Matrices with non-finite entries have rank 0.
pub fn numerical_rank<const R: usize, const C: usize>(m: &na::SMatrix<f64, R, C>) -> usize {
    let m_dyn = na::DMatrix::<f64>::from_iterator(R, C, m.iter().copied());
    let scale = m_dyn.norm();
    if scale == 0.0 || !scale.is_finite() {
        return 0;
    }
    m_dyn.rank(RANK_TOLERANCE * scale)
}

#[allow(non_snake_case)]
pub fn is_controllable<const N: usize>(
    A: &na::SMatrix<f64, N, N>,
    B: &na::SMatrix<f64, N, 1>,
) -> bool {
    numerical_rank(&controllability_matrix(A, B)) == N
}

/// Eigenvalues of a real square matrix. None if the Schur decomposition does not converge.
pub fn eigenvalues<const N: usize>(m: &na::SMatrix<f64, N, N>) -> Option<Vec<Complex<f64>>> {
    // Convert to complex matrix to solve eigenvalues
    let m_complex = na::DMatrix::<Complex<f64>>::from_iterator(
        N,
        N,
        m.iter().map(|x| Complex::new(*x, 0.0)),
    );
    m_complex
        .eigenvalues()
        .map(|eigenvalues| eigenvalues.iter().copied().collect())
}

#[allow(non_snake_case)]
/// Determine if a continuous closed loop system is stable,
/// i.e. every eigenvalue lies strictly in the left half plane.
pub fn is_hurwitz<const N: usize>(A_clp: &na::SMatrix<f64, N, N>) -> bool {
    match eigenvalues(A_clp) {
        Some(eigenvalues) => eigenvalues.iter().all(|eigenvalue| eigenvalue.re < 0.0),
        None => false,
    }
}

#[allow(non_snake_case)]
/// Determine if A and C is detectable (continuous time).
/// See PHB-test: https://en.wikipedia.org/wiki/Hautus_lemma
pub fn is_detectable<const N: usize, const NY: usize>(
    A: &na::SMatrix<f64, N, N>,
    C: &na::SMatrix<f64, NY, N>,
) -> bool {
    let Some(eigenvalues) = eigenvalues(A) else {
        return false;
    };

    // Marginal modes count as unstable, rounding can push an exact zero slightly left
    let marginal = -RANK_TOLERANCE * A.norm().max(1.0);
    for eigenvalue in eigenvalues.iter().filter(|eigenvalue| eigenvalue.re >= marginal) {
        // check that rank [A - eigenvalue*I; C] = n
        let phb_matrix = na::DMatrix::<Complex<f64>>::from_fn(N + NY, N, |i, j| {
            if i < N {
                let diagonal = if i == j { *eigenvalue } else { Complex::new(0.0, 0.0) };
                Complex::new(A[(i, j)], 0.0) - diagonal
            } else {
                Complex::new(C[(i - N, j)], 0.0)
            }
        });
        let scale = phb_matrix.norm().max(f64::MIN_POSITIVE);
        if phb_matrix.rank(RANK_TOLERANCE * scale) != N {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hurwitz() {
        let m = na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, -1.0, 0.0);
        assert_eq!(is_hurwitz(&m), false, "Undamped system is not stable");

        let m = na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, -1.0, -0.4);
        assert_eq!(is_hurwitz(&m), true, "Damped system is stable");

        let m = na::SMatrix::<f64, 2, 2>::new(0.2, 0.0, 0.0, -1.0);
        assert_eq!(is_hurwitz(&m), false, "Unstable system is not stable");

        let m = na::SMatrix::<f64, 2, 2>::new(-0.9, 0.0, 0.0, -0.1);
        assert_eq!(is_hurwitz(&m), true, "Stable system is stable");
    }

    #[test]
    fn test_controllability() {
        let a_matrix = na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, 0.0, 0.0);
        let b_matrix = na::SMatrix::<f64, 2, 1>::new(0.0, 1.0);
        assert!(is_controllable(&a_matrix, &b_matrix), "Double integrator");
        assert_eq!(
            controllability_matrix(&a_matrix, &b_matrix),
            na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, 1.0, 0.0)
        );

        let a_matrix = na::SMatrix::<f64, 2, 2>::new(1.0, 0.0, 0.0, 2.0);
        let b_matrix = na::SMatrix::<f64, 2, 1>::new(1.0, 0.0);
        assert!(!is_controllable(&a_matrix, &b_matrix), "Second mode is not reachable");

        let b_matrix = na::SMatrix::<f64, 2, 1>::zeros();
        assert!(!is_controllable(&a_matrix, &b_matrix), "No input");
        assert_eq!(numerical_rank(&b_matrix), 0);
    }

    #[test]
    fn test_detectability() {
        let a_matrix = na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, 0.0, -41.67);
        let c_matrix = na::SMatrix::<f64, 1, 2>::new(1.0, 0.0);
        assert_eq!(
            is_detectable(&a_matrix, &c_matrix),
            true,
            "Position measurement of a motor"
        );

        let c_matrix = na::SMatrix::<f64, 1, 2>::new(0.0, 1.0);
        assert_eq!(
            is_detectable(&a_matrix, &c_matrix),
            false,
            "Integrator mode is invisible from velocity"
        );

        let a_matrix = na::SMatrix::<f64, 2, 2>::new(-0.9, 0.0, 0.0, -0.5);
        assert_eq!(
            is_detectable(&a_matrix, &c_matrix),
            true,
            "Stable system is always detectable"
        );

        let a_matrix = na::SMatrix::<f64, 2, 2>::new(0.0, 2.0, -2.0, 0.0);
        let c_matrix = na::SMatrix::<f64, 1, 2>::new(1.0, 0.0);
        assert_eq!(
            is_detectable(&a_matrix, &c_matrix),
            true,
            "Oscillator observed through its position"
        );
    }

    #[test]
    fn test_eigenvalues_complex_pair() {
        let m = na::SMatrix::<f64, 2, 2>::new(-1.0, 2.0, -2.0, -1.0);
        let mut eigs = eigenvalues(&m).unwrap();
        eigs.sort_by(|a, b| a.im.partial_cmp(&b.im).unwrap());

        approx::assert_relative_eq!(eigs[0].re, -1.0, epsilon = 1e-10);
        approx::assert_relative_eq!(eigs[0].im, -2.0, epsilon = 1e-10);
        approx::assert_relative_eq!(eigs[1].im, 2.0, epsilon = 1e-10);
    }
}
