extern crate nalgebra as na;

use na::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::models::DcMotor;
use crate::reference::ReferenceSignal;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorParams {
    /// Motor gain K_m
    pub gain: f64,
    /// Motor time constant tau_m, seconds
    pub time_constant: f64,
}

impl Default for MotorParams {
    fn default() -> Self {
        Self {
            gain: 1.695,
            time_constant: 0.024,
        }
    }
}

/// A closed loop pole. Real poles may omit `im`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pole {
    pub re: f64,
    #[serde(default)]
    pub im: f64,
}

impl Pole {
    pub fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl From<Pole> for Complex<f64> {
    fn from(pole: Pole) -> Self {
        Complex::new(pole.re, pole.im)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub motor: MotorParams,
    /// Output matrix C, position is measured by default
    pub output_matrix: [f64; 2],
    pub desired_poles: Vec<Pole>,
    /// Observer gain L
    pub observer_gain: [f64; 2],
    /// Integration step, seconds
    pub dt: f64,
    /// End of the time grid (exclusive), seconds
    pub t_final: f64,
    pub reference: ReferenceSignal,
    pub initial_state: [f64; 2],
    pub initial_estimate: [f64; 2],
    /// Report the first step where a state magnitude exceeds this value
    pub divergence_threshold: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            motor: MotorParams::default(),
            output_matrix: [1.0, 0.0],
            desired_poles: vec![Pole::real(-2.0), Pole::real(-3.0)],
            observer_gain: [240.0, 19200.0],
            dt: 0.001,
            t_final: 10.0,
            reference: ReferenceSignal::default(),
            initial_state: [0.0, 1.0],
            initial_estimate: [0.0, 0.0],
            divergence_threshold: None,
        }
    }
}

fn require(condition: bool, message: impl FnOnce() -> String) -> ControlResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ControlError::InvalidConfig(message()))
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> ControlResult<()> {
        require(self.dt.is_finite() && self.dt > 0.0, || {
            format!("dt must be positive, got {}", self.dt)
        })?;
        require(self.t_final.is_finite() && self.t_final > 0.0, || {
            format!("t_final must be positive, got {}", self.t_final)
        })?;
        require(
            self.motor.time_constant.is_finite() && self.motor.time_constant > 0.0,
            || {
                format!(
                    "motor time constant must be positive, got {}",
                    self.motor.time_constant
                )
            },
        )?;
        if self.desired_poles.len() != 2 {
            return Err(ControlError::PoleCount {
                expected: 2,
                actual: self.desired_poles.len(),
            });
        }
        match self.reference {
            ReferenceSignal::Step { step_time } => {
                require(step_time.is_finite() && step_time >= 0.0, || {
                    format!("step time must be non-negative, got {step_time}")
                })?
            }
            ReferenceSignal::Sine { frequency_hz } => {
                require(frequency_hz.is_finite() && frequency_hz > 0.0, || {
                    format!("sine frequency must be positive, got {frequency_hz}")
                })?
            }
        }
        if let Some(threshold) = self.divergence_threshold {
            require(threshold > 0.0, || {
                format!("divergence threshold must be positive, got {threshold}")
            })?;
        }
        Ok(())
    }

    pub fn plant(&self) -> DcMotor {
        DcMotor::dc_motor(
            self.motor.gain,
            self.motor.time_constant,
            na::SMatrix::<f64, 1, 2>::from_row_slice(&self.output_matrix),
        )
    }

    pub fn poles(&self) -> Vec<Complex<f64>> {
        self.desired_poles.iter().copied().map(Complex::from).collect()
    }

    pub fn observer_gain(&self) -> na::SMatrix<f64, 2, 1> {
        na::SMatrix::<f64, 2, 1>::from_column_slice(&self.observer_gain)
    }

    pub fn initial_state(&self) -> na::SVector<f64, 2> {
        na::SVector::<f64, 2>::from_column_slice(&self.initial_state)
    }

    pub fn initial_estimate(&self) -> na::SVector<f64, 2> {
        na::SVector::<f64, 2>::from_column_slice(&self.initial_estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.plant().c_matrix, na::SMatrix::<f64, 1, 2>::new(1.0, 0.0));
        assert_eq!(config.observer_gain()[1], 19200.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{
                "t_final": 4.0,
                "desired_poles": [{ "re": -1.0, "im": 2.0 }, { "re": -1.0, "im": -2.0 }],
                "reference": { "kind": "sine", "frequency_hz": 0.5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.t_final, 4.0);
        assert_eq!(config.dt, 0.001);
        assert_eq!(config.motor, MotorParams::default());
        assert_eq!(config.poles()[1], Complex::new(-1.0, -2.0));
        assert_eq!(config.reference, ReferenceSignal::Sine { frequency_hz: 0.5 });
        config.validate().unwrap();
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = SimulationConfig {
            dt: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ControlError::InvalidConfig(_))));

        let config = SimulationConfig {
            desired_poles: vec![Pole::real(-1.0)],
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ControlError::PoleCount {
                expected: 2,
                actual: 1
            })
        );

        let config = SimulationConfig {
            reference: ReferenceSignal::Sine { frequency_hz: -1.0 },
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ControlError::InvalidConfig(_))));
    }
}
