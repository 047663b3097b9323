pub mod ackermann;
pub mod reference_scaling;
