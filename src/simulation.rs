extern crate nalgebra as na;

use debug_print::debug_println;
use na::Complex;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::controllers::ackermann::place_poles;
use crate::controllers::reference_scaling::reference_scaling;
use crate::dynamics::ErrorDynamics;
use crate::error::ControlResult;
use crate::integrators::rk4_step;
use crate::linsystheory::{eigenvalues, is_detectable, is_hurwitz};
use crate::models::LinearSystem;
use crate::observers::luenberger::LuenbergerObserver;
use crate::observers::observer::Observer;
use crate::reference::ReferenceSignal;

/// Samples 0, dt, 2 dt, ... strictly below `t_final`.
///
/// A quotient `t_final / dt` within rounding of an integer counts as that integer,
/// so `t_final = 10, dt = 0.001` gives exactly 10000 samples.
pub fn time_grid(dt: f64, t_final: f64) -> Vec<f64> {
    let steps = t_final / dt;
    let rounded = steps.round();
    let len = if (steps - rounded).abs() <= 1.0e-9 * rounded.max(1.0) {
        rounded
    } else {
        steps.ceil()
    };
    (0..len.max(0.0) as usize).map(|i| i as f64 * dt).collect()
}

/// Gains of a single-input single-output observer based servo
#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlDesign<const N: usize> {
    pub system: LinearSystem<N, 1, 1>,
    /// State feedback gain
    pub K: na::SMatrix<f64, 1, N>,
    /// Observer gain
    pub L: na::SMatrix<f64, N, 1>,
    /// Reference feedforward gain
    pub feedforward: f64,
}

#[allow(non_snake_case)]
impl<const N: usize> ControlDesign<N> {
    /// Place the closed loop poles and compute the reference scaling.
    /// Fails before any simulation state exists.
    pub fn new(
        system: LinearSystem<N, 1, 1>,
        desired_poles: &[Complex<f64>],
        L: na::SMatrix<f64, N, 1>,
    ) -> ControlResult<Self> {
        let K = place_poles(&system.a_matrix, &system.b_matrix, desired_poles)?;
        let feedforward = reference_scaling(&system, &K)?;
        let design = Self {
            system,
            K,
            L,
            feedforward,
        };

        info!(
            feedback_gain = ?design.K.as_slice(),
            feedforward = design.feedforward,
            "controller designed"
        );
        debug_println!("A - BK = {}", design.closed_loop_matrix());
        debug_println!("A - LC = {}", design.observer_error_matrix());

        if !is_detectable(&system.a_matrix, &system.c_matrix) {
            warn!("(A, C) is not detectable, the estimate cannot converge");
        }
        if !is_hurwitz(&design.observer_error_matrix()) {
            warn!(
                observer_poles = ?design.observer_poles(),
                "observer error dynamics are not stable"
            );
        }
        Ok(design)
    }

    /// u = -K*x_hat + N*r
    pub fn control(&self, x_hat: &na::SVector<f64, N>, r: f64) -> f64 {
        -(self.K * x_hat)[0] + self.feedforward * r
    }

    pub fn closed_loop_matrix(&self) -> na::SMatrix<f64, N, N> {
        self.system.a_matrix - self.system.b_matrix * self.K
    }

    pub fn observer_error_matrix(&self) -> na::SMatrix<f64, N, N> {
        self.system.a_matrix - self.L * self.system.c_matrix
    }

    pub fn closed_loop_poles(&self) -> Option<Vec<Complex<f64>>> {
        eigenvalues(&self.closed_loop_matrix())
    }

    pub fn observer_poles(&self) -> Option<Vec<Complex<f64>>> {
        eigenvalues(&self.observer_error_matrix())
    }
}

impl ControlDesign<2> {
    pub fn from_config(config: &SimulationConfig) -> ControlResult<Self> {
        Self::new(config.plant(), &config.poles(), config.observer_gain())
    }
}

/// Time series recorded by the loop, one entry per time sample
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationHistory<const N: usize> {
    pub time: Vec<f64>,
    pub x: Vec<na::SVector<f64, N>>,
    pub x_hat: Vec<na::SVector<f64, N>>,
    /// Error as integrated by the loop, see [`ErrorDynamics`]
    pub error: Vec<na::SVector<f64, N>>,
    pub u: Vec<f64>,
    pub r: Vec<f64>,
    /// First sample whose state left the divergence threshold
    pub diverged_at: Option<usize>,
}

impl<const N: usize> SimulationHistory<N> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            x: Vec::with_capacity(capacity),
            x_hat: Vec::with_capacity(capacity),
            error: Vec::with_capacity(capacity),
            u: Vec::with_capacity(capacity),
            r: Vec::with_capacity(capacity),
            diverged_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Plain difference x - x_hat per sample
    pub fn estimation_error(&self) -> Vec<na::SVector<f64, N>> {
        self.x
            .iter()
            .zip(self.x_hat.iter())
            .map(|(x, x_hat)| x - x_hat)
            .collect()
    }

    /// y = C*x per sample
    #[allow(non_snake_case)]
    pub fn output(&self, C: &na::SMatrix<f64, 1, N>) -> Vec<f64> {
        self.x.iter().map(|x| (C * x)[0]).collect()
    }

    /// Component `index` of every vector in `series`
    pub fn component(series: &[na::SVector<f64, N>], index: usize) -> Vec<f64> {
        series.iter().map(|v| v[index]).collect()
    }
}

pub struct Simulation<'a, const N: usize> {
    design: &'a ControlDesign<N>,
    reference: ReferenceSignal,
    dt: f64,
    x: na::SVector<f64, N>,
    observer: LuenbergerObserver<N, 1, 1>,
    error: na::SVector<f64, N>,
    divergence_threshold: Option<f64>,
    history: SimulationHistory<N>,
}

impl<'a, const N: usize> Simulation<'a, N> {
    /// True state and estimate start independently; a wrong initial estimate
    /// shows the observer converging.
    pub fn new(
        design: &'a ControlDesign<N>,
        reference: ReferenceSignal,
        dt: f64,
        x0: na::SVector<f64, N>,
        x_hat0: na::SVector<f64, N>,
    ) -> Self {
        Self {
            design,
            reference,
            dt,
            x: x0,
            observer: LuenbergerObserver::new(design.system, design.L, x_hat0, dt),
            error: x0 - x_hat0,
            divergence_threshold: None,
            history: SimulationHistory::with_capacity(0),
        }
    }

    pub fn with_divergence_threshold(mut self, threshold: Option<f64>) -> Self {
        self.divergence_threshold = threshold;
        self
    }

    pub fn state(&self) -> &na::SVector<f64, N> {
        &self.x
    }

    pub fn estimate(&self) -> na::SVector<f64, N> {
        self.observer.get_estimate()
    }

    pub fn error(&self) -> &na::SVector<f64, N> {
        &self.error
    }

    pub fn history(&self) -> &SimulationHistory<N> {
        &self.history
    }

    /// One transition of the loop at time `t`.
    pub fn step(&mut self, t: f64) {
        let r = self.reference.evaluate(t);

        // Control acts on the estimate, not on the true state
        let u = self.design.control(&self.observer.get_estimate(), r);
        let u_vec = na::SVector::<f64, 1>::new(u);

        // Measure before advancing
        let y = self.design.system.output(&self.x);

        self.x = rk4_step(&self.design.system, &self.x, &u_vec, &(), self.dt);
        self.observer.update(&u_vec, &y);
        let x_hat = self.observer.get_estimate();
        // Integrated from the freshly advanced x and x_hat
        self.error = rk4_step(&ErrorDynamics, &self.x, &x_hat, &(), self.dt);

        if let Some(threshold) = self.divergence_threshold {
            let diverged = self
                .x
                .iter()
                .chain(x_hat.iter())
                .any(|v| !v.is_finite() || v.abs() > threshold);
            if diverged && self.history.diverged_at.is_none() {
                let step = self.history.len();
                warn!(step, t, threshold, "simulation diverged");
                self.history.diverged_at = Some(step);
            }
        }

        self.history.time.push(t);
        self.history.x.push(self.x);
        self.history.x_hat.push(x_hat);
        self.history.error.push(self.error);
        self.history.u.push(u);
        self.history.r.push(r);
    }

    /// Run over the whole time grid and hand back the history.
    pub fn run(mut self, time_grid: &[f64]) -> SimulationHistory<N> {
        let additional = time_grid.len();
        self.history.time.reserve(additional);
        self.history.x.reserve(additional);
        self.history.x_hat.reserve(additional);
        self.history.error.reserve(additional);
        self.history.u.reserve(additional);
        self.history.r.reserve(additional);

        for &t in time_grid {
            self.step(t);
        }
        debug!(samples = self.history.len(), "simulation finished");
        self.history
    }
}

/// Validate the configuration, design the controller and run the loop.
pub fn simulate(config: &SimulationConfig) -> ControlResult<(ControlDesign<2>, SimulationHistory<2>)> {
    config.validate()?;
    let design = ControlDesign::from_config(config)?;
    let grid = time_grid(config.dt, config.t_final);
    info!(samples = grid.len(), dt = config.dt, reference = ?config.reference, "simulating");

    let history = Simulation::new(
        &design,
        config.reference,
        config.dt,
        config.initial_state(),
        config.initial_estimate(),
    )
    .with_divergence_threshold(config.divergence_threshold)
    .run(&grid);
    Ok((design, history))
}
