//! Per-pixel stages of the color pipeline.
//!
//! Each stage is a pure function over a linear RGB triple. The order they are
//! composed in by [`process_pixel`] is fixed.

use crate::image_pipeline::color::LogCurve;
use crate::image_pipeline::common::color_math::{self, Matrix3, PROPHOTO_LUMA};
use crate::image_pipeline::lut::Lut3D;
use crate::image_pipeline::metering::TARGET_GRAY;
use crate::image_pipeline::render::types::{RenderSettings, ToneParameters};

pub const BLACKS_SCALE: f32 = 0.1;
pub const WHITES_SCALE: f32 = 0.5;
pub const SHADOW_HIGHLIGHT_STRENGTH: f32 = 0.5;
pub const CONTRAST_PIVOT: f32 = TARGET_GRAY as f32;

#[inline]
fn scale(rgb: [f32; 3], k: f32) -> [f32; 3] {
    [rgb[0] * k, rgb[1] * k, rgb[2] * k]
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn normalize(raw: [u16; 3], max_value: f32, input_gamma: f32) -> [f32; 3] {
    let mut rgb = [
        raw[0] as f32 / max_value,
        raw[1] as f32 / max_value,
        raw[2] as f32 / max_value,
    ];
    if input_gamma > 1.0 {
        for v in &mut rgb {
            *v = v.powf(input_gamma);
        }
    }
    rgb
}

#[inline]
pub fn white_balance(rgb: [f32; 3], wb: &[f32; 3]) -> [f32; 3] {
    [rgb[0] * wb[0], rgb[1] * wb[1], rgb[2] * wb[2]]
}

#[inline]
pub fn exposure(rgb: [f32; 3], stops: f32) -> [f32; 3] {
    scale(rgb, stops.exp2())
}

#[inline]
pub fn levels(rgb: [f32; 3], blacks: f32, whites: f32) -> [f32; 3] {
    let black_offset = blacks * BLACKS_SCALE;
    let white_gain = 1.0 + whites * WHITES_SCALE;
    [
        (rgb[0] + black_offset) * white_gain,
        (rgb[1] + black_offset) * white_gain,
        (rgb[2] + black_offset) * white_gain,
    ]
}

#[inline]
pub fn shadows_highlights(rgb: [f32; 3], shadows: f32, highlights: f32) -> [f32; 3] {
    let luma = color_math::luminance(rgb, &PROPHOTO_LUMA);
    let shadow_mask = 1.0 - smoothstep(0.0, 0.5, luma);
    let highlight_mask = smoothstep(0.5, 1.0, luma);
    let rgb = scale(rgb, 1.0 + shadows * shadow_mask * SHADOW_HIGHLIGHT_STRENGTH);
    scale(rgb, 1.0 + highlights * highlight_mask * SHADOW_HIGHLIGHT_STRENGTH)
}

#[inline]
pub fn saturation(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    let luma = color_math::luminance(rgb, &PROPHOTO_LUMA);
    [
        luma + (rgb[0] - luma) * amount,
        luma + (rgb[1] - luma) * amount,
        luma + (rgb[2] - luma) * amount,
    ]
}

#[inline]
pub fn contrast(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    [
        (rgb[0] - CONTRAST_PIVOT) * amount + CONTRAST_PIVOT,
        (rgb[1] - CONTRAST_PIVOT) * amount + CONTRAST_PIVOT,
        (rgb[2] - CONTRAST_PIVOT) * amount + CONTRAST_PIVOT,
    ]
}

/// Exposure, levels, shadows/highlights, saturation, contrast.
#[inline]
pub fn tone_adjust(rgb: [f32; 3], tone: &ToneParameters) -> [f32; 3] {
    let rgb = exposure(rgb, tone.exposure);
    let rgb = levels(rgb, tone.blacks, tone.whites);
    let rgb = shadows_highlights(rgb, tone.shadows, tone.highlights);
    let rgb = saturation(rgb, tone.saturation);
    contrast(rgb, tone.contrast)
}

/// Target gamut transform followed by the non-negative clamp log curves need.
#[inline]
pub fn to_target_gamut(rgb: [f32; 3], matrix: &Matrix3) -> [f32; 3] {
    let out = color_math::apply_matrix(matrix, rgb);
    // NaN.max(0.0) is 0.0
    [out[0].max(0.0), out[1].max(0.0), out[2].max(0.0)]
}

#[inline]
pub fn log_encode(rgb: [f32; 3], curve: LogCurve) -> [f32; 3] {
    curve.encode_rgb(rgb)
}

#[inline]
pub fn apply_lut(rgb: [f32; 3], lut: Option<&Lut3D>) -> [f32; 3] {
    match lut {
        Some(lut) => lut.sample(rgb),
        None => rgb,
    }
}

/// Normalize, white balance and camera matrix: raw samples to linear
/// working-space RGB.
#[inline]
pub fn to_working(
    raw: [u16; 3],
    max_value: f32,
    input_gamma: f32,
    wb: &[f32; 3],
    cam_to_working: &Matrix3,
) -> [f32; 3] {
    let rgb = normalize(raw, max_value, input_gamma);
    let rgb = white_balance(rgb, wb);
    color_math::apply_matrix(cam_to_working, rgb)
}

/// Runs one raw pixel through every stage.
#[inline]
pub fn process_pixel(raw: [u16; 3], max_value: f32, settings: &RenderSettings) -> [f32; 3] {
    let rgb = to_working(
        raw,
        max_value,
        settings.tone.input_gamma,
        &settings.wb_multipliers,
        &settings.cam_to_working,
    );
    let rgb = tone_adjust(rgb, &settings.tone);
    let rgb = to_target_gamut(rgb, &settings.working_to_target);
    let rgb = log_encode(rgb, settings.log_curve);
    apply_lut(rgb, settings.lut.as_deref())
}
