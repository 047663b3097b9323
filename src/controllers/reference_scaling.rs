extern crate nalgebra as na;

use crate::error::{ControlError, ControlResult};
use crate::models::LinearSystem;

/// Feedforward gain giving unity DC gain from reference to output
/// under the control law u = -K*x + N*r:
///
/// N = [-C * (A - B*K)^-1 * B]^-1
#[allow(non_snake_case)]
pub fn reference_scaling<const N: usize>(
    system: &LinearSystem<N, 1, 1>,
    K: &na::SMatrix<f64, 1, N>,
) -> ControlResult<f64> {
    let A_clp = system.a_matrix - system.b_matrix * K;
    let A_clp_inv = A_clp.try_inverse().ok_or_else(|| {
        ControlError::DegenerateScaling("closed loop matrix A - BK is singular".to_owned())
    })?;

    let dc_gain = -(system.c_matrix * A_clp_inv * system.b_matrix)[(0, 0)];
    if dc_gain == 0.0 || !dc_gain.is_finite() {
        return Err(ControlError::DegenerateScaling(format!(
            "closed loop DC gain is {dc_gain}"
        )));
    }
    Ok(1.0 / dc_gain)
}
