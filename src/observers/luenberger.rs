extern crate nalgebra as na;

use crate::dynamics::ObserverDynamics;
use crate::integrators::rk4_step;
use crate::models::LinearSystem;
use crate::observers::observer::Observer;

/// Continuous time Luenberger observer, integrated with a fixed RK4 step.
#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug)]
pub struct LuenbergerObserver<const NX: usize, const NY: usize, const NU: usize> {
    // dx_hat/dt = A*x_hat + B*u + L*(y - C*x_hat)
    model: LinearSystem<NX, NY, NU>,
    L: na::SMatrix<f64, NX, NY>,
    x_hat: na::SVector<f64, NX>,
    dt: f64,
}

#[allow(non_snake_case)]
impl<const NX: usize, const NY: usize, const NU: usize> LuenbergerObserver<NX, NY, NU> {
    pub fn new(
        model: LinearSystem<NX, NY, NU>,
        L: na::SMatrix<f64, NX, NY>,
        x_hat: na::SVector<f64, NX>,
        dt: f64,
    ) -> Self {
        Self {
            model,
            L,
            x_hat,
            dt,
        }
    }

    /// Observer error dynamics A - L*C
    pub fn error_matrix(&self) -> na::SMatrix<f64, NX, NX> {
        self.model.a_matrix - self.L * self.model.c_matrix
    }
}

impl<const NX: usize, const NY: usize, const NU: usize> Observer<NX, NY, NU>
    for LuenbergerObserver<NX, NY, NU>
{
    fn update(&mut self, u: &na::SVector<f64, NU>, y: &na::SVector<f64, NY>) {
        let dynamics = ObserverDynamics {
            model: &self.model,
            L: &self.L,
        };
        self.x_hat = rk4_step(&dynamics, &self.x_hat, u, y, self.dt);
    }

    fn get_estimate(&self) -> na::SVector<f64, NX> {
        self.x_hat
    }
}
