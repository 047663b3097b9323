extern crate nalgebra as na;

/// Continuous Linear Time-Invariant System
/// dx/dt = A*x + B*u
/// y = C*x
/// No noise and no direct feedthrough is considered
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearSystem<const NX: usize, const NY: usize, const NU: usize> {
    pub a_matrix: na::SMatrix<f64, NX, NX>,
    pub b_matrix: na::SMatrix<f64, NX, NU>,
    pub c_matrix: na::SMatrix<f64, NY, NX>,
}

impl<const NX: usize, const NY: usize, const NU: usize> LinearSystem<NX, NY, NU> {
    pub fn new(
        a_matrix: na::SMatrix<f64, NX, NX>,
        b_matrix: na::SMatrix<f64, NX, NU>,
        c_matrix: na::SMatrix<f64, NY, NX>,
    ) -> Self {
        Self {
            a_matrix,
            b_matrix,
            c_matrix,
        }
    }

    pub fn state_derivative(
        &self,
        x: &na::SVector<f64, NX>,
        u: &na::SVector<f64, NU>,
    ) -> na::SVector<f64, NX> {
        self.a_matrix * x + self.b_matrix * u
    }

    pub fn output(&self, x: &na::SVector<f64, NX>) -> na::SVector<f64, NY> {
        self.c_matrix * x
    }
}

/// Position/velocity model of a DC motor driven by a voltage input.
///
/// With motor gain `K_m` and time constant `tau_m`:
/// A = [0, 1; 0, -1/tau_m], B = [0; K_m/tau_m]
pub type DcMotor = LinearSystem<2, 1, 1>;

impl LinearSystem<2, 1, 1> {
    pub fn dc_motor(gain: f64, time_constant: f64, c_matrix: na::SMatrix<f64, 1, 2>) -> Self {
        let a_matrix = na::SMatrix::<f64, 2, 2>::new(0.0, 1.0, 0.0, -1.0 / time_constant);
        let b_matrix = na::SMatrix::<f64, 2, 1>::new(0.0, gain / time_constant);
        Self::new(a_matrix, b_matrix, c_matrix)
    }
}
