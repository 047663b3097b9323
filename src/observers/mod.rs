pub mod luenberger;
pub mod observer;
