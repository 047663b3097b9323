use approx::assert_abs_diff_eq;
use servo_observer::config::{MotorParams, Pole};
use servo_observer::reference::ReferenceSignal;
use servo_observer::simulation::time_grid;
use servo_observer::{simulate, ControlError, SimulationConfig};

#[test]
fn step_reference_is_tracked_and_estimate_converges() {
    let config = SimulationConfig::default();
    let (design, history) = simulate(&config).unwrap();

    let x_end = history.x.last().unwrap();
    let x_hat_end = history.x_hat.last().unwrap();

    // Unity DC gain from r to y = C x
    assert_abs_diff_eq!(design.system.output(x_end)[0], 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(x_end[1], 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(*x_end, *x_hat_end, epsilon = 1e-8);

    // The estimate has caught up long before the end
    let errors = history.estimation_error();
    let settled = errors.iter().skip(1000).map(|e| e.norm()).fold(0.0, f64::max);
    assert!(settled < 2e-3, "estimate still off by {settled} after 1 s");
}

#[test]
fn initial_estimation_error_shrinks() {
    let config = SimulationConfig::default();
    let (_, history) = simulate(&config).unwrap();
    let errors = history.estimation_error();

    let initial = (config.initial_state() - config.initial_estimate()).norm();
    assert!(errors[100].norm() < 0.1 * initial);
}

#[test]
fn runs_are_bit_identical() {
    let config = SimulationConfig {
        reference: ReferenceSignal::Sine { frequency_hz: 0.5 },
        t_final: 3.0,
        ..SimulationConfig::default()
    };
    let (_, first) = simulate(&config).unwrap();
    let (_, second) = simulate(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn buffers_share_the_grid_length() {
    let config = SimulationConfig::default();
    let (_, history) = simulate(&config).unwrap();
    let n = time_grid(config.dt, config.t_final).len();

    assert_eq!(n, 10000);
    assert_eq!(history.len(), n);
    assert_eq!(history.time.len(), n);
    assert_eq!(history.x.len(), n);
    assert_eq!(history.x_hat.len(), n);
    assert_eq!(history.error.len(), n);
    assert_eq!(history.u.len(), n);
    assert_eq!(history.r.len(), n);
    assert!(history.x.iter().all(|x| x.nrows() == 2 && x.ncols() == 1));
}

#[test]
fn step_time_delays_the_reference() {
    let config = SimulationConfig {
        reference: ReferenceSignal::Step { step_time: 2.0 },
        t_final: 3.0,
        ..SimulationConfig::default()
    };
    let (_, history) = simulate(&config).unwrap();

    assert!(history.r[..2000].iter().all(|r| *r == 0.0));
    assert!(history.r[2000..].iter().all(|r| *r == 1.0));
}

#[test]
fn sine_reference_stays_bounded() {
    let config = SimulationConfig {
        reference: ReferenceSignal::Sine { frequency_hz: 0.5 },
        ..SimulationConfig::default()
    };
    let (_, history) = simulate(&config).unwrap();

    assert!(history.r.iter().all(|r| r.abs() <= 1.0));
    assert!(history.x.iter().all(|x| x.iter().all(|v| v.is_finite() && v.abs() < 10.0)));
}

#[test]
fn complex_poles_are_accepted() {
    let config = SimulationConfig {
        desired_poles: vec![Pole { re: -3.0, im: 2.0 }, Pole { re: -3.0, im: -2.0 }],
        ..SimulationConfig::default()
    };
    let (design, history) = simulate(&config).unwrap();

    let mut poles = design.closed_loop_poles().unwrap();
    poles.sort_by(|a, b| a.im.partial_cmp(&b.im).unwrap());
    assert_abs_diff_eq!(poles[0].re, -3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(poles[0].im, -2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(design.system.output(history.x.last().unwrap())[0], 1.0, epsilon = 1e-5);
}

#[test]
fn setup_errors_abort_before_simulation() {
    let config = SimulationConfig {
        motor: MotorParams {
            gain: 0.0,
            time_constant: 0.024,
        },
        ..SimulationConfig::default()
    };
    assert_eq!(
        simulate(&config).unwrap_err(),
        ControlError::Uncontrollable { rank: 0, order: 2 }
    );

    let config = SimulationConfig {
        desired_poles: vec![Pole { re: -1.0, im: 1.0 }, Pole::real(-2.0)],
        ..SimulationConfig::default()
    };
    assert_eq!(simulate(&config).unwrap_err(), ControlError::NonConjugatePoles);

    // Velocity measurement leaves the position integrator unobservable in y,
    // so the DC gain from r to y is zero
    let config = SimulationConfig {
        output_matrix: [0.0, 1.0],
        ..SimulationConfig::default()
    };
    assert!(matches!(
        simulate(&config).unwrap_err(),
        ControlError::DegenerateScaling(_)
    ));
}
