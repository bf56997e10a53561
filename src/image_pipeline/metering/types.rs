//! Metering configuration types

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::image_pipeline::common::color_math::{IDENTITY, Matrix3};
use crate::image_pipeline::render::stages;

/// Mid-gray level every average-based strategy aims for.
pub const TARGET_GRAY: f64 = 0.18;
/// Largest `p99 * gain` allowed before the gain is clamped.
pub const HIGHLIGHT_CEILING: f64 = 6.0;
/// Where highlight-safe metering places the 99th percentile.
pub const HIGHLIGHT_TARGET: f64 = 0.9;
/// Approximate number of samples taken from the raster.
pub const TARGET_SAMPLE_COUNT: usize = 40_000;

/// Auto-exposure metering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeteringMode {
    /// Geometric mean with a 99th-percentile highlight clamp
    #[default]
    Hybrid,
    /// 5x5 zone grid with center bias and highlight/shadow heuristics
    Matrix,
    /// Gaussian falloff from the frame center
    CenterWeighted,
    /// Places the 99th percentile at 0.9, ignoring the mean
    HighlightSafe,
    /// Plain geometric mean
    Average,
}

impl MeteringMode {
    pub fn name(self) -> &'static str {
        match self {
            MeteringMode::Hybrid => "hybrid",
            MeteringMode::Matrix => "matrix",
            MeteringMode::CenterWeighted => "center-weighted",
            MeteringMode::HighlightSafe => "highlight-safe",
            MeteringMode::Average => "average",
        }
    }

    pub(crate) fn needs_positions(self) -> bool {
        matches!(self, MeteringMode::Matrix | MeteringMode::CenterWeighted)
    }
}

impl fmt::Display for MeteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeteringMode {
    type Err = std::convert::Infallible;

    /// Unknown names meter as [`MeteringMode::Hybrid`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => MeteringMode::Hybrid,
            "matrix" => MeteringMode::Matrix,
            "center-weighted" | "center_weighted" | "centerweighted" => {
                MeteringMode::CenterWeighted
            }
            "highlight-safe" | "highlight_safe" | "highlightsafe" => MeteringMode::HighlightSafe,
            "average" => MeteringMode::Average,
            other => {
                warn!(mode = other, "Unknown metering mode, using hybrid");
                MeteringMode::Hybrid
            }
        };
        Ok(mode)
    }
}

/// Raw samples → linear working-space RGB, applied to every metering sample
/// before its luminance is taken. Same math as the first render stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingSpace {
    pub wb_multipliers: [f32; 3],
    pub cam_to_working: Matrix3,
    pub input_gamma: f32,
}

impl Default for WorkingSpace {
    fn default() -> Self {
        Self {
            wb_multipliers: [1.0, 1.0, 1.0],
            cam_to_working: IDENTITY,
            input_gamma: 1.0,
        }
    }
}

impl WorkingSpace {
    #[inline]
    pub fn apply(&self, raw: [u16; 3], max_value: f32) -> [f32; 3] {
        stages::to_working(
            raw,
            max_value,
            self.input_gamma,
            &self.wb_multipliers,
            &self.cam_to_working,
        )
    }
}

/// Luminance samples gathered from a raster, with their pixel positions
/// when the strategy is spatial.
#[derive(Debug, Clone, Default)]
pub(crate) struct MeteringSamples {
    pub lumas: Vec<f64>,
    pub positions: Vec<(usize, usize)>,
    pub width: usize,
    pub height: usize,
}
