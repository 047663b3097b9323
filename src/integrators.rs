extern crate nalgebra as na;

use crate::dynamics::Dynamics;

/// Advance `state` by one step of the classical fourth order Runge-Kutta method.
///
/// The input and the extra argument are held constant over the step.
pub fn rk4_step<D, const N: usize>(
    dynamics: &D,
    state: &na::SVector<f64, N>,
    input: &D::Input,
    extra: &D::Extra,
    dt: f64,
) -> na::SVector<f64, N>
where
    D: Dynamics<N>,
{
    let k1 = dynamics.derivative(state, input, extra);
    let k2 = dynamics.derivative(&(state + 0.5 * dt * k1), input, extra);
    let k3 = dynamics.derivative(&(state + 0.5 * dt * k2), input, extra);
    let k4 = dynamics.derivative(&(state + dt * k3), input, extra);
    const ONE_BY_SIX: f64 = 1.0 / 6.0;
    state + (ONE_BY_SIX * dt) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}
