//! Color pipeline
//!
//! White balance → camera matrix → tone/color → target gamut → log curve →
//! LUT, applied per pixel in that order, plus a statistics readback that
//! reuses the same math.

mod pipeline;
pub mod stages;
mod stats;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::ColorPipeline;
pub use stats::{MAX_STATISTICS_SAMPLES, compute_statistics, statistics_stride};
pub use types::{
    FrameStatistics, RenderSettings, RenderSettingsBuilder, RenderedFrame, ToneParameters,
    ToneParametersBuilder,
};
