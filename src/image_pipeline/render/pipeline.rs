use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::image_pipeline::common::buffer::PixelBuffer;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::render::stages;
use crate::image_pipeline::render::stats;
use crate::image_pipeline::render::types::{FrameStatistics, RenderSettings, RenderedFrame};

/// Applies the fixed stage chain to whole buffers.
///
/// Holds no mutable state, so one pipeline (and the LUT inside its settings)
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ColorPipeline {
    settings: RenderSettings,
}

impl ColorPipeline {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Overrides the exposure, e.g. with a metered value.
    pub fn with_exposure(mut self, stops: f32) -> Self {
        self.settings.tone.exposure = stops;
        self
    }

    fn check_resources(&self, buffer: &PixelBuffer) -> Result<()> {
        buffer.validate()?;
        match self.settings.lut.as_deref() {
            Some(lut) => lut.validate()?,
            None => debug!("No LUT, stage is pass-through"),
        }
        if self.settings.tone.is_neutral() {
            debug!("Neutral tone parameters");
        }
        if !self.settings.tone.exposure.is_finite() {
            warn!(exposure = self.settings.tone.exposure, "Non-finite exposure");
        }
        Ok(())
    }

    /// Renders `buffer` into an RGBA float frame (rows bottom-up).
    #[instrument(skip_all, fields(width = buffer.width, height = buffer.height, curve = %self.settings.log_curve))]
    pub fn render(&self, buffer: &PixelBuffer) -> Result<RenderedFrame> {
        self.check_resources(buffer)?;

        let width = buffer.width;
        let height = buffer.height;
        let max_value = buffer.max_value();
        let settings = &self.settings;

        let mut data = vec![0.0f32; width * height * RenderedFrame::CHANNELS];
        data.par_chunks_mut(width * RenderedFrame::CHANNELS)
            .enumerate()
            .for_each(|(row, out)| {
                let y = height - 1 - row;
                for (x, px) in out.chunks_exact_mut(RenderedFrame::CHANNELS).enumerate() {
                    let rgb = stages::process_pixel(buffer.pixel(x, y), max_value, settings);
                    px[0] = rgb[0];
                    px[1] = rgb[1];
                    px[2] = rgb[2];
                    px[3] = 1.0;
                }
            });

        debug!("Render complete");
        Ok(RenderedFrame {
            width,
            height,
            data,
        })
    }

    /// Renders `buffer` off-screen and reduces it to min / max / mean.
    pub fn render_statistics(&self, buffer: &PixelBuffer) -> Result<FrameStatistics> {
        let frame = self.render(buffer)?;
        stats::compute_statistics(&frame)
    }
}
