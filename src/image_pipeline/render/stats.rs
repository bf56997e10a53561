use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::render::types::{FrameStatistics, RenderedFrame};

pub const MAX_STATISTICS_SAMPLES: usize = 400_000;

/// Grid step keeping the readback at or under [`MAX_STATISTICS_SAMPLES`].
pub fn statistics_stride(width: usize, height: usize) -> usize {
    let total = width as f64 * height as f64;
    ((total / MAX_STATISTICS_SAMPLES as f64).sqrt().ceil() as usize).max(1)
}

pub fn compute_statistics(frame: &RenderedFrame) -> Result<FrameStatistics> {
    if frame.is_empty() {
        return Err(PipelineError::InvalidDimensions(frame.width, frame.height));
    }
    frame.check_len()?;

    let stride = statistics_stride(frame.width, frame.height);
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut samples = 0usize;

    for row in (0..frame.height).step_by(stride) {
        for x in (0..frame.width).step_by(stride) {
            let idx = (row * frame.width + x) * RenderedFrame::CHANNELS;
            let value = (frame.data[idx] + frame.data[idx + 1] + frame.data[idx + 2]) / 3.0;
            min = min.min(value);
            max = max.max(value);
            sum += value as f64;
            samples += 1;
        }
    }

    let mean = (sum / samples as f64) as f32;
    debug!(stride, samples, min, max, mean, "Frame statistics");
    Ok(FrameStatistics {
        min,
        max,
        mean,
        samples,
    })
}
