//! Float frame → integer raster conversion.
//!
//! All conversions flip rows so the output is top-down, drop alpha where the
//! target has none, clamp to [0, 1] and truncate.

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::render::RenderedFrame;

fn check_frame(frame: &RenderedFrame) -> Result<()> {
    if frame.is_empty() {
        return Err(PipelineError::EmptyExport);
    }
    frame.check_len()
}

#[inline]
fn quantize(v: f32, max: f32) -> f32 {
    // NaN clamps to 0
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (v * max).floor()
}

fn convert<T, F>(frame: &RenderedFrame, channels: usize, map: F) -> Result<Vec<T>>
where
    F: Fn(f32) -> T,
{
    check_frame(frame)?;
    let row_len = frame.width * RenderedFrame::CHANNELS;
    let mut out = Vec::with_capacity(frame.width * frame.height * channels);
    for row in frame.data[..row_len * frame.height].chunks_exact(row_len).rev() {
        for px in row.chunks_exact(RenderedFrame::CHANNELS) {
            out.extend(px[..channels].iter().map(|&v| map(v)));
        }
    }
    Ok(out)
}

/// Interleaved top-down RGB, `floor(v * 65535)`.
pub fn to_rgb16(frame: &RenderedFrame) -> Result<Vec<u16>> {
    convert(frame, 3, |v| quantize(v, 65535.0) as u16)
}

/// Interleaved top-down RGB, `floor(v * 255)`.
pub fn to_rgb8(frame: &RenderedFrame) -> Result<Vec<u8>> {
    convert(frame, 3, |v| quantize(v, 255.0) as u8)
}

/// Interleaved top-down RGBA, `floor(v * 255)`.
pub fn to_rgba8(frame: &RenderedFrame) -> Result<Vec<u8>> {
    convert(frame, 4, |v| quantize(v, 255.0) as u8)
}
