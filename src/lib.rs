extern crate nalgebra as na;

pub mod cli;
pub mod config;
pub mod controllers;
pub mod dynamics;
pub mod error;
pub mod integrators;
pub mod linsystheory;
pub mod logging;
pub mod models;
pub mod observers;
pub mod plotting;
pub mod polynomial;
pub mod reference;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{ControlError, ControlResult, RenderError};
pub use simulation::{simulate, ControlDesign, Simulation, SimulationHistory};
