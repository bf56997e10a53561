//! Auto-exposure metering
//!
//! Samples a decoded raster on a regular grid, reduces it to luminance and
//! turns that into a recommended exposure in stops.

mod engine;
mod strategies;
pub mod types;


pub use engine::{
    calculate_auto_exposure, calculate_auto_exposure_in, gain_to_ev, recommended_gain,
    recommended_gain_in, sample_stride,
};
pub use types::{HIGHLIGHT_CEILING, MeteringMode, TARGET_GRAY, TARGET_SAMPLE_COUNT, WorkingSpace};
