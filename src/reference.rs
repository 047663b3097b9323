use serde::{Deserialize, Serialize};

/// Reference r(t) fed through the feedforward gain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceSignal {
    /// 0 before `step_time`, 1 from `step_time` on
    Step { step_time: f64 },
    /// sin(2 pi f t)
    Sine { frequency_hz: f64 },
}

impl Default for ReferenceSignal {
    fn default() -> Self {
        ReferenceSignal::Step { step_time: 0.0 }
    }
}

impl ReferenceSignal {
    pub fn evaluate(&self, t: f64) -> f64 {
        match *self {
            ReferenceSignal::Step { step_time } => {
                if t < step_time {
                    0.0
                } else {
                    1.0
                }
            }
            ReferenceSignal::Sine { frequency_hz } => {
                (2.0 * std::f64::consts::PI * frequency_hz * t).sin()
            }
        }
    }
}
