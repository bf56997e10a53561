//! Export configuration types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::PipelineError;

/// Output container / codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// 16-bit RGB TIFF
    #[default]
    Tiff16,
    Png,
    Jpeg,
    WebP,
}

impl ExportFormat {
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Tiff16 => "tiff",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::WebP => "webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Tiff16 => "tif",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Tiff16 => "image/tiff",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::WebP => "image/webp",
        }
    }

    /// 8-bit formats go through the raster backend.
    pub fn is_raster(self) -> bool {
        !matches!(self, ExportFormat::Tiff16)
    }

    /// Whether [`ExportConfig::quality`] has any effect.
    pub fn is_lossy(self) -> bool {
        matches!(self, ExportFormat::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a format name, a MIME type or a file extension (with or without
/// the leading dot).
impl FromStr for ExportFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match key.as_str() {
            "tiff" | "tif" | "tiff16" | "image/tiff" => Ok(ExportFormat::Tiff16),
            "png" | "image/png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(ExportFormat::Jpeg),
            "webp" | "image/webp" => Ok(ExportFormat::WebP),
            _ => Err(PipelineError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// Single uncompressed strip, written byte for byte
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Configuration for writing a rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Lossy quality in 0..=1; ignored by lossless formats
    pub quality: f32,
    /// Written as the TIFF ImageDescription tag when set
    pub description: Option<String>,
    pub compression: TiffCompression,
    /// Predictor value for compressed TIFF (2 = horizontal differencing)
    pub predictor: Option<u16>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Tiff16,
            quality: 0.92,
            description: None,
            compression: TiffCompression::None,
            predictor: None,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }

    /// Quality mapped onto the 1..=100 scale codecs use.
    pub fn quality_percent(&self) -> u8 {
        let q = if self.quality.is_finite() { self.quality } else { 0.92 };
        (q.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    format: Option<ExportFormat>,
    quality: Option<f32>,
    description: Option<Option<String>>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
}

impl ExportConfigBuilder {
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            format: self.format.unwrap_or(default.format),
            quality: self.quality.unwrap_or(default.quality),
            description: self.description.unwrap_or(default.description),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
        }
    }
}
