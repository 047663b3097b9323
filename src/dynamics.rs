extern crate nalgebra as na;

use crate::models::LinearSystem;

pub trait Dynamics<const N: usize> {
    type Input;
    type Extra;

    fn derivative(
        &self,
        state: &na::SVector<f64, N>,
        input: &Self::Input,
        extra: &Self::Extra,
    ) -> na::SVector<f64, N>;
}

/// Plant: dx/dt = A*x + B*u
impl<const NX: usize, const NY: usize, const NU: usize> Dynamics<NX> for LinearSystem<NX, NY, NU> {
    type Input = na::SVector<f64, NU>;
    type Extra = ();

    fn derivative(
        &self,
        state: &na::SVector<f64, NX>,
        input: &na::SVector<f64, NU>,
        _extra: &(),
    ) -> na::SVector<f64, NX> {
        self.state_derivative(state, input)
    }
}

/// Luenberger observer: dx_hat/dt = A*x_hat + B*u + L*(y - C*x_hat)
#[allow(non_snake_case)]
pub struct ObserverDynamics<'a, const NX: usize, const NY: usize, const NU: usize> {
    pub model: &'a LinearSystem<NX, NY, NU>,
    pub L: &'a na::SMatrix<f64, NX, NY>,
}

impl<'a, const NX: usize, const NY: usize, const NU: usize> Dynamics<NX>
    for ObserverDynamics<'a, NX, NY, NU>
{
    type Input = na::SVector<f64, NU>;
    /// Measured plant output y
    type Extra = na::SVector<f64, NY>;

    fn derivative(
        &self,
        state: &na::SVector<f64, NX>,
        input: &na::SVector<f64, NU>,
        extra: &na::SVector<f64, NY>,
    ) -> na::SVector<f64, NX> {
        let y_est = self.model.output(state);
        self.model.state_derivative(state, input) + self.L * (extra - y_est)
    }
}

/// Estimation error, recomputed algebraically as `state - input`.
///
/// This is not the derivative of the error. The simulation integrates it with
/// the true state as `state` and the estimate as `input`, so the recorded error
/// trajectory is x + dt/6 * (k1 + 2 k2 + 2 k3 + k4) rather than x - x_hat.
/// Kept as is so the recorded trajectory stays reproducible; use
/// `SimulationHistory::estimation_error` for the plain difference.
#[derive(Copy, Clone, Debug, Default)]
pub struct ErrorDynamics;

impl<const N: usize> Dynamics<N> for ErrorDynamics {
    type Input = na::SVector<f64, N>;
    type Extra = ();

    fn derivative(
        &self,
        state: &na::SVector<f64, N>,
        input: &na::SVector<f64, N>,
        _extra: &(),
    ) -> na::SVector<f64, N> {
        state - input
    }
}
