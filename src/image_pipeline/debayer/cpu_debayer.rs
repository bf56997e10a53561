use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info, warn};

use crate::image_pipeline::common::buffer::PixelBuffer;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raw::RawImageData;

/// Maps a decoder CFA name onto one of the 2×2 patterns the bayer crate knows.
pub fn cfa_from_name(name: &str) -> Option<CFA> {
    let upper = name.to_ascii_uppercase();
    match upper.get(..4)? {
        "RGGB" => Some(CFA::RGGB),
        "BGGR" => Some(CFA::BGGR),
        "GRBG" => Some(CFA::GRBG),
        "GBRG" => Some(CFA::GBRG),
        _ => None,
    }
}

/// Demosaics CFA mosaics to interleaved RGB on the CPU (bilinear).
pub struct CpuDebayer;

impl CpuDebayer {
    /// Returns a 3-channel 16-bit buffer. Input that is already RGB passes
    /// through unchanged.
    pub fn process(&self, raw_image: &RawImageData) -> Result<PixelBuffer> {
        let width = raw_image.width;
        let height = raw_image.height;

        if raw_image.channels == 3 {
            debug!("Image is already RGB, skipping demosaic");
            return raw_image.to_pixel_buffer();
        }

        let cfa = cfa_from_name(&raw_image.cfa).unwrap_or_else(|| {
            warn!(cfa = %raw_image.cfa, "Unsupported CFA pattern, assuming RGGB");
            CFA::RGGB
        });
        info!("Starting CPU debayering for image {}x{}", width, height);

        if raw_image.data.len() < width * height {
            return Err(PipelineError::InvalidBuffer(format!(
                "mosaic needs {} samples, got {}",
                width * height,
                raw_image.data.len()
            )));
        }

        // The bayer crate reads a byte stream; samples are already 16-bit.
        let bayer_bytes: Vec<u8> = raw_image.data[..width * height]
            .iter()
            .flat_map(|&val| val.to_le_bytes())
            .collect();

        let mut output_buf = vec![0u8; width * height * 3 * 2];
        let mut cursor = Cursor::new(&bayer_bytes[..]);
        {
            let mut output_raster =
                RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);

            debug!(cfa = %raw_image.cfa, "Running linear demosaic");
            bayer::run_demosaic(
                &mut cursor,
                BayerDepth::Depth16LE,
                cfa,
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| PipelineError::DecodeError(format!("Demosaic failed: {:?}", e)))?;
        }

        // RasterMut writes native-endian u16 samples
        let rgb_data: Vec<u16> = output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect();

        PixelBuffer::rgb16(width, height, rgb_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mosaic(width: usize, height: usize, value: u16) -> RawImageData {
        RawImageData {
            width,
            height,
            channels: 1,
            data: vec![value; width * height],
            bits_per_sample: 14,
            cfa: "RGGB".into(),
            cam_to_xyz: None,
            wb_multipliers: [1.0; 3],
            make: String::new(),
            model: String::new(),
        }
    }

    #[test]
    fn cfa_names() {
        assert!(matches!(cfa_from_name("RGGB"), Some(CFA::RGGB)));
        assert!(matches!(cfa_from_name("bggr"), Some(CFA::BGGR)));
        assert!(matches!(cfa_from_name("GRBGGRBG"), Some(CFA::GRBG)));
        assert!(cfa_from_name("XTRANS").is_none());
        assert!(cfa_from_name("").is_none());
    }

    #[test]
    fn flat_mosaic_stays_flat() {
        let rgb = CpuDebayer.process(&mosaic(8, 6, 20000)).unwrap();
        assert_eq!(rgb.channels, 3);
        assert_eq!(rgb.data.len(), 8 * 6 * 3);
        assert!(rgb.data.iter().all(|&v| v == 20000));
    }

    #[test]
    fn rgb_input_passes_through() {
        let mut raw = mosaic(2, 2, 7);
        raw.channels = 3;
        raw.data = (0..12).collect();
        let rgb = CpuDebayer.process(&raw).unwrap();
        assert_eq!(rgb.data, (0..12).collect::<Vec<u16>>());
    }
}
