//! Decoded pixel buffer handed to metering and rendering.

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Decoded integer raster, row-major and channel-interleaved.
///
/// 8-bit samples are stored widened in the same `u16` array; `bit_depth`
/// decides the normalisation scale.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    /// 1 (monochrome / CFA mosaic) or 3 (RGB)
    pub channels: usize,
    /// 8 or 16
    pub bit_depth: u32,
    pub data: Vec<u16>,
}

impl PixelBuffer {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        bit_depth: u32,
        data: Vec<u16>,
    ) -> Result<Self> {
        let buffer = Self {
            width,
            height,
            channels,
            bit_depth,
            data,
        };
        buffer.validate()?;
        Ok(buffer)
    }

    pub fn rgb16(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        Self::new(width, height, 3, 16, data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidDimensions(self.width, self.height));
        }
        if self.channels != 1 && self.channels != 3 {
            return Err(PipelineError::InvalidBuffer(format!(
                "unsupported channel count {}",
                self.channels
            )));
        }
        if self.bit_depth != 8 && self.bit_depth != 16 {
            return Err(PipelineError::InvalidBuffer(format!(
                "unsupported bit depth {}",
                self.bit_depth
            )));
        }
        let expected = self.sample_count()?;
        if self.data.len() < expected {
            return Err(PipelineError::InvalidBuffer(format!(
                "expected {} samples for {}x{}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.channels,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// `width * height * channels`, or an error when that overflows.
    pub fn sample_count(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.channels))
            .ok_or_else(|| {
                PipelineError::InvalidBuffer(format!(
                    "{}x{}x{} samples overflow",
                    self.width, self.height, self.channels
                ))
            })
    }

    /// 65535 for 16-bit data, 255 for 8-bit.
    pub fn max_value(&self) -> f32 {
        if self.bit_depth == 16 { 65535.0 } else { 255.0 }
    }

    /// Raw samples of the pixel at `(x, y)`; a single-channel pixel is
    /// broadcast to all three.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u16; 3] {
        let idx = (y * self.width + x) * self.channels;
        if self.channels == 1 {
            let v = self.data[idx];
            [v, v, v]
        } else {
            [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            PixelBuffer::new(0, 4, 3, 16, vec![]),
            Err(PipelineError::InvalidDimensions(0, 4))
        ));
        assert!(PixelBuffer::new(2, 2, 4, 16, vec![0; 16]).is_err());
        assert!(PixelBuffer::new(2, 2, 3, 12, vec![0; 12]).is_err());
        assert!(PixelBuffer::new(2, 2, 3, 16, vec![0; 11]).is_err());
    }

    #[test]
    fn huge_dimensions_are_rejected() {
        assert!(matches!(
            PixelBuffer::new(usize::MAX / 2, 4, 3, 16, vec![0; 12]),
            Err(PipelineError::InvalidBuffer(_))
        ));
        let buffer = PixelBuffer::new(3, 2, 3, 16, vec![0; 18]).unwrap();
        assert_eq!(buffer.sample_count().unwrap(), 18);
    }

    #[test]
    fn mono_pixels_broadcast() {
        let buffer = PixelBuffer::new(2, 1, 1, 8, vec![10, 200]).unwrap();
        assert_eq!(buffer.pixel(1, 0), [200, 200, 200]);
        assert_eq!(buffer.max_value(), 255.0);
    }
}
