//! 3D LUT types

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Dense N×N×N RGB→RGB table, stored in `.cube` file order: red varies
/// fastest, then green, then blue.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    pub title: Option<String>,
    /// Grid resolution per axis
    pub size: usize,
    /// At least `size³ × 3` values; anything past that is ignored
    pub data: Vec<f32>,
    pub domain_min: [f32; 3],
    pub domain_max: [f32; 3],
}

impl Lut3D {
    /// Number of floats a grid of `size` needs. Sizes whose grid does not
    /// fit in `usize` are rejected.
    pub fn expected_len(size: usize) -> Result<usize> {
        size.checked_mul(size)
            .and_then(|n| n.checked_mul(size))
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| PipelineError::InvalidLut(format!("LUT size {} is too large", size)))
    }

    /// Identity table of the given size.
    pub fn identity(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(PipelineError::InvalidLut(format!(
                "identity LUT needs at least 2 points per axis, got {}",
                size
            )));
        }
        let step = 1.0 / (size - 1) as f32;
        let mut data = Vec::with_capacity(Self::expected_len(size)?);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.extend_from_slice(&[r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Ok(Self {
            title: None,
            size,
            data,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        })
    }

    /// Checks the grid is usable for sampling.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(PipelineError::InvalidLut("LUT size must be positive".into()));
        }
        let expected = Self::expected_len(self.size)?;
        if self.data.len() < expected {
            return Err(PipelineError::InsufficientLutData {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn entry(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        let idx = (r + g * self.size + b * self.size * self.size) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}
