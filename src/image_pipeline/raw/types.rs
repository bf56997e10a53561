//! RAW image data types

use crate::image_pipeline::common::buffer::PixelBuffer;
use crate::image_pipeline::common::error::Result;

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Components per pixel: 1 for a CFA mosaic, 3 for linear RGB raws
    pub channels: usize,
    /// Black-subtracted samples scaled so the sensor white level is 65535
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// CFA pattern name as reported by the decoder, e.g. "RGGB"
    pub cfa: String,
    /// Camera → XYZ, 3 rows of 4 (4th column unused); `None` if unknown
    pub cam_to_xyz: Option<Vec<f32>>,
    /// As-shot white balance normalised to green
    pub wb_multipliers: [f32; 3],
    pub make: String,
    pub model: String,
}

impl RawImageData {
    /// The samples as a 16-bit pixel buffer ready for metering/rendering.
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer> {
        PixelBuffer::new(self.width, self.height, self.channels, 16, self.data.clone())
    }
}
