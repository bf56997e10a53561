use std::sync::Arc;

use crate::image_pipeline::color::LogCurve;
use crate::image_pipeline::common::color_math::{IDENTITY, Matrix3};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::lut::Lut3D;
use crate::image_pipeline::metering::WorkingSpace;

/// Exposure, tone and color adjustments. Ranges are advisory; nothing here
/// is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParameters {
    /// Stops
    pub exposure: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub whites: f32,
    pub blacks: f32,
    /// Values above 1.0 linearise gamma-encoded input
    pub input_gamma: f32,
}

impl Default for ToneParameters {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            saturation: 1.0,
            contrast: 1.0,
            highlights: 0.0,
            shadows: 0.0,
            whites: 0.0,
            blacks: 0.0,
            input_gamma: 1.0,
        }
    }
}

impl ToneParameters {
    pub fn builder() -> ToneParametersBuilder {
        ToneParametersBuilder::default()
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Default)]
pub struct ToneParametersBuilder {
    exposure: Option<f32>,
    saturation: Option<f32>,
    contrast: Option<f32>,
    highlights: Option<f32>,
    shadows: Option<f32>,
    whites: Option<f32>,
    blacks: Option<f32>,
    input_gamma: Option<f32>,
}

impl ToneParametersBuilder {
    pub fn exposure(mut self, stops: f32) -> Self {
        self.exposure = Some(stops);
        self
    }

    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = Some(saturation);
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn highlights(mut self, highlights: f32) -> Self {
        self.highlights = Some(highlights);
        self
    }

    pub fn shadows(mut self, shadows: f32) -> Self {
        self.shadows = Some(shadows);
        self
    }

    pub fn whites(mut self, whites: f32) -> Self {
        self.whites = Some(whites);
        self
    }

    pub fn blacks(mut self, blacks: f32) -> Self {
        self.blacks = Some(blacks);
        self
    }

    pub fn input_gamma(mut self, gamma: f32) -> Self {
        self.input_gamma = Some(gamma);
        self
    }

    pub fn build(self) -> ToneParameters {
        let default = ToneParameters::default();
        ToneParameters {
            exposure: self.exposure.unwrap_or(default.exposure),
            saturation: self.saturation.unwrap_or(default.saturation),
            contrast: self.contrast.unwrap_or(default.contrast),
            highlights: self.highlights.unwrap_or(default.highlights),
            shadows: self.shadows.unwrap_or(default.shadows),
            whites: self.whites.unwrap_or(default.whites),
            blacks: self.blacks.unwrap_or(default.blacks),
            input_gamma: self.input_gamma.unwrap_or(default.input_gamma),
        }
    }
}

/// Everything one render needs besides the pixels.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub wb_multipliers: [f32; 3],
    /// Camera → working space, row-major
    pub cam_to_working: Matrix3,
    /// Working space → target gamut, row-major
    pub working_to_target: Matrix3,
    pub log_curve: LogCurve,
    pub tone: ToneParameters,
    pub lut: Option<Arc<Lut3D>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let log_curve = LogCurve::default();
        Self {
            wb_multipliers: [1.0, 1.0, 1.0],
            cam_to_working: IDENTITY,
            working_to_target: log_curve.target_gamut().from_prophoto(),
            log_curve,
            tone: ToneParameters::default(),
            lut: None,
        }
    }
}

impl RenderSettings {
    pub fn builder() -> RenderSettingsBuilder {
        RenderSettingsBuilder::default()
    }

    /// The raw → working-space part of these settings, for metering.
    pub fn working_space(&self) -> WorkingSpace {
        WorkingSpace {
            wb_multipliers: self.wb_multipliers,
            cam_to_working: self.cam_to_working,
            input_gamma: self.tone.input_gamma,
        }
    }
}

#[derive(Default)]
pub struct RenderSettingsBuilder {
    wb_multipliers: Option<[f32; 3]>,
    cam_to_working: Option<Matrix3>,
    working_to_target: Option<Matrix3>,
    log_curve: Option<LogCurve>,
    tone: Option<ToneParameters>,
    lut: Option<Option<Arc<Lut3D>>>,
}

impl RenderSettingsBuilder {
    pub fn wb_multipliers(mut self, wb: [f32; 3]) -> Self {
        self.wb_multipliers = Some(wb);
        self
    }

    pub fn cam_to_working(mut self, matrix: Matrix3) -> Self {
        self.cam_to_working = Some(matrix);
        self
    }

    /// Overrides the gamut matrix that would otherwise follow the curve.
    pub fn working_to_target(mut self, matrix: Matrix3) -> Self {
        self.working_to_target = Some(matrix);
        self
    }

    pub fn log_curve(mut self, curve: LogCurve) -> Self {
        self.log_curve = Some(curve);
        self
    }

    pub fn tone(mut self, tone: ToneParameters) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn lut(mut self, lut: Option<Arc<Lut3D>>) -> Self {
        self.lut = Some(lut);
        self
    }

    pub fn build(self) -> RenderSettings {
        let default = RenderSettings::default();
        let log_curve = self.log_curve.unwrap_or(default.log_curve);
        RenderSettings {
            wb_multipliers: self.wb_multipliers.unwrap_or(default.wb_multipliers),
            cam_to_working: self.cam_to_working.unwrap_or(default.cam_to_working),
            working_to_target: self
                .working_to_target
                .unwrap_or_else(|| log_curve.target_gamut().from_prophoto()),
            log_curve,
            tone: self.tone.unwrap_or(default.tone),
            lut: self.lut.unwrap_or(default.lut),
        }
    }
}

/// RGBA float output of one render. Alpha is always 1.0.
///
/// Rows are stored bottom-up, the way a framebuffer readback returns them;
/// row 0 of `data` is the bottom row of the image.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl RenderedFrame {
    pub const CHANNELS: usize = 4;

    /// RGBA of image pixel `(x, y)` with `y = 0` at the top.
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        let row = self.height - 1 - y;
        let idx = (row * self.width + x) * Self::CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Checks `data` holds a full `width * height` RGBA raster.
    pub fn check_len(&self) -> Result<()> {
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(Self::CHANNELS))
            .ok_or_else(|| {
                PipelineError::InvalidBuffer(format!(
                    "{}x{} frame overflows",
                    self.width, self.height
                ))
            })?;
        if self.data.len() < expected {
            return Err(PipelineError::InvalidBuffer(format!(
                "frame needs {} floats, got {}",
                expected,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Min / max / mean of the per-pixel channel average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub samples: usize,
}
