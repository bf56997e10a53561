//! RAW image reader implementation using the rawloader library.
//!
//! Supports any format rawloader can decode (ARW, CR2, NEF, DNG, RAF, ...).
//! Besides the samples it pulls out the metadata the color pipeline needs:
//! black/white levels, the camera→XYZ matrix and the as-shot white balance.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::RawImageData;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Minimum bits needed to hold `white_level` (4095 → 12, 16383 → 14).
pub(crate) fn bits_for_white_level(white_level: u16) -> u32 {
    if white_level == 0 {
        DEFAULT_BITS_PER_SAMPLE
    } else {
        U16_BITS - white_level.leading_zeros()
    }
}

/// Subtracts `black` and stretches `[black, white]` onto the full u16 range.
#[inline]
pub(crate) fn scale_sample(value: u16, black: u16, white: u16) -> u16 {
    let range = (white as f32 - black as f32).max(1.0);
    let v = (value as f32 - black as f32).max(0.0) / range;
    (v * u16::MAX as f32).min(u16::MAX as f32) as u16
}

/// `[r/g, 1, b/g]`, or unity gains if the coefficients are unusable.
pub(crate) fn normalize_wb(coeffs: [f32; 4]) -> [f32; 3] {
    let [r, g, b, _] = coeffs;
    if !(g.is_finite() && r.is_finite() && b.is_finite()) || g <= 0.0 || r <= 0.0 || b <= 0.0 {
        warn!(?coeffs, "Unusable white balance coefficients, using unity gains");
        return [1.0, 1.0, 1.0];
    }
    [r / g, 1.0, b / g]
}

/// Row-major 3×4 flattening; `None` for an all-zero or non-finite matrix.
pub(crate) fn flatten_cam_to_xyz(matrix: [[f32; 4]; 3]) -> Option<Vec<f32>> {
    let flat: Vec<f32> = matrix.iter().flatten().copied().collect();
    if flat.iter().any(|v| !v.is_finite()) || flat.iter().all(|&v| v == 0.0) {
        return None;
    }
    Some(flat)
}

impl RawImageReader for RawLoaderReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        let channels = decoded.cpp;

        debug!(
            "Decoded {} {}: {}x{}, cpp={}, cfa={}",
            decoded.make, decoded.model, width, height, channels, decoded.cfa.name
        );

        if channels != 1 && channels != 3 {
            return Err(PipelineError::DecodeError(format!(
                "unsupported components per pixel: {}",
                channels
            )));
        }

        let data: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let color = if channels == 1 {
                        decoded.cfa.color_at(i / width, i % width)
                    } else {
                        i % 3
                    };
                    let color = color.min(3);
                    scale_sample(v, decoded.blacklevels[color], decoded.whitelevels[color])
                })
                .collect(),
            // Float data is already normalised to 0.0-1.0
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                .collect(),
        };

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = bits_for_white_level(max_white_level);
        debug!(
            "Calculated bits_per_sample: {} (max white level: {})",
            bits_per_sample, max_white_level
        );

        let cam_to_xyz = flatten_cam_to_xyz(decoded.cam_to_xyz_normalized());
        if cam_to_xyz.is_none() {
            warn!("RAW file carries no usable camera matrix");
        }

        Ok(RawImageData {
            width,
            height,
            channels,
            data,
            bits_per_sample,
            cfa: decoded.cfa.name.clone(),
            cam_to_xyz,
            wb_multipliers: normalize_wb(decoded.wb_coeffs),
            make: decoded.clean_make.clone(),
            model: decoded.clean_model.clone(),
        })
    }
}
