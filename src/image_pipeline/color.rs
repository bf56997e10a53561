//! Log encodings and their matched target gamuts.

pub mod gamut;
pub mod log_curve;


pub use gamut::TargetGamut;
pub use log_curve::{ALL_CURVES, LogCurve};
