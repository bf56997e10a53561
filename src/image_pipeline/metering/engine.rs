use tracing::debug;

use crate::image_pipeline::common::buffer::PixelBuffer;
use crate::image_pipeline::common::color_math::PROPHOTO_LUMA;
use crate::image_pipeline::metering::strategies;
use crate::image_pipeline::metering::types::{
    MeteringMode, MeteringSamples, TARGET_SAMPLE_COUNT, WorkingSpace,
};

/// Grid stride that keeps the sample count near [`TARGET_SAMPLE_COUNT`].
pub fn sample_stride(width: usize, height: usize) -> usize {
    let total = width as f64 * height as f64;
    ((total / TARGET_SAMPLE_COUNT as f64).sqrt().floor() as usize).max(1)
}

pub(crate) fn gather_samples(
    buffer: &PixelBuffer,
    with_positions: bool,
    space: &WorkingSpace,
) -> MeteringSamples {
    let stride = sample_stride(buffer.width, buffer.height);
    let max_value = buffer.max_value();
    let weights = PROPHOTO_LUMA.map(f64::from);

    let mut samples = MeteringSamples {
        width: buffer.width,
        height: buffer.height,
        ..Default::default()
    };

    for y in (0..buffer.height).step_by(stride) {
        for x in (0..buffer.width).step_by(stride) {
            let idx = (y * buffer.width + x) * buffer.channels;
            let raw = if buffer.channels == 1 {
                match buffer.data.get(idx) {
                    Some(&v) => [v, v, v],
                    None => continue,
                }
            } else {
                match buffer.data.get(idx..idx + 3) {
                    Some(px) => [px[0], px[1], px[2]],
                    None => continue,
                }
            };
            let rgb = space.apply(raw, max_value);
            let luma = rgb[0] as f64 * weights[0]
                + rgb[1] as f64 * weights[1]
                + rgb[2] as f64 * weights[2];
            samples.lumas.push(luma);
            if with_positions {
                samples.positions.push((x, y));
            }
        }
    }

    debug!(
        stride,
        count = samples.lumas.len(),
        "Gathered metering samples"
    );
    samples
}

/// Linear gain recommended by `mode`, or `None` when the raster yields no
/// samples. The buffer is taken to already be in the working space.
pub fn recommended_gain(buffer: &PixelBuffer, mode: MeteringMode) -> Option<f64> {
    recommended_gain_in(buffer, mode, &WorkingSpace::default())
}

/// [`recommended_gain`] for camera-native data, converted per sample by `space`.
pub fn recommended_gain_in(
    buffer: &PixelBuffer,
    mode: MeteringMode,
    space: &WorkingSpace,
) -> Option<f64> {
    if buffer.width == 0 || buffer.height == 0 || buffer.data.is_empty() {
        return None;
    }

    let samples = gather_samples(buffer, mode.needs_positions(), space);
    if samples.lumas.is_empty() {
        return None;
    }

    let gain = match mode {
        MeteringMode::Average => strategies::average(&samples.lumas),
        MeteringMode::Hybrid => strategies::hybrid(&samples.lumas),
        MeteringMode::HighlightSafe => strategies::highlight_safe(&samples.lumas),
        MeteringMode::CenterWeighted => strategies::center_weighted(&samples),
        MeteringMode::Matrix => strategies::matrix(&samples),
    };
    Some(gain)
}

/// Converts a linear gain to stops. Non-positive or non-finite gains map to 0.
pub fn gain_to_ev(gain: f64) -> f32 {
    if !gain.is_finite() || gain <= 0.0 {
        return 0.0;
    }
    gain.log2() as f32
}

/// Recommended exposure in stops for `buffer`. A degenerate raster meters as 0 EV.
pub fn calculate_auto_exposure(buffer: &PixelBuffer, mode: MeteringMode) -> f32 {
    calculate_auto_exposure_in(buffer, mode, &WorkingSpace::default())
}

/// [`calculate_auto_exposure`] after converting each sample through `space`.
pub fn calculate_auto_exposure_in(
    buffer: &PixelBuffer,
    mode: MeteringMode,
    space: &WorkingSpace,
) -> f32 {
    let ev = recommended_gain_in(buffer, mode, space)
        .map(gain_to_ev)
        .unwrap_or(0.0);
    debug!(mode = %mode, ev, "Auto exposure computed");
    ev
}
