//! 8-bit PNG / JPEG / WebP through the `image` crate.

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::encode::types::{ExportConfig, ExportFormat};
use crate::image_pipeline::encode::writer::ImageWriter;
use crate::image_pipeline::render::RenderedFrame;

pub struct RasterWriter;

impl RasterWriter {
    /// Whether the crate was built with the raster backend.
    pub fn available() -> bool {
        cfg!(feature = "raster")
    }
}

#[cfg(feature = "raster")]
fn encode(frame: &RenderedFrame, config: &ExportConfig) -> Result<Vec<u8>> {
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::codecs::webp::WebPEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    use crate::image_pipeline::encode::convert;

    let encode_error = |e: image::ImageError| {
        PipelineError::EncodeError(format!("{} export error: {}", config.format, e))
    };
    let (w, h) = (frame.width as u32, frame.height as u32);
    let mut buffer: Vec<u8> = Vec::new();

    match config.format {
        ExportFormat::Jpeg => {
            let rgb = convert::to_rgb8(frame)?;
            JpegEncoder::new_with_quality(&mut buffer, config.quality_percent())
                .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
                .map_err(encode_error)?;
        }
        ExportFormat::Png => {
            let rgba = convert::to_rgba8(frame)?;
            PngEncoder::new(&mut buffer)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(encode_error)?;
        }
        ExportFormat::WebP => {
            let rgba = convert::to_rgba8(frame)?;
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(encode_error)?;
        }
        ExportFormat::Tiff16 => {
            return Err(PipelineError::UnsupportedFormat(
                "16-bit TIFF is not a raster format".into(),
            ));
        }
    }
    Ok(buffer)
}

#[cfg(not(feature = "raster"))]
fn encode(_frame: &RenderedFrame, config: &ExportConfig) -> Result<Vec<u8>> {
    Err(PipelineError::BackendUnavailable(format!(
        "{} export needs the `raster` feature",
        config.format
    )))
}

impl ImageWriter for RasterWriter {
    fn write_frame(
        &self,
        frame: &RenderedFrame,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        if frame.is_empty() {
            return Err(PipelineError::EmptyExport);
        }
        debug!(format = %config.format, "Encoding {}x{} raster", frame.width, frame.height);
        let bytes = encode(frame, config)?;
        output
            .write_all(&bytes)
            .map_err(|e| PipelineError::OutputWriteError(e.to_string()))?;
        debug!(bytes = bytes.len(), "Raster encoding complete");
        Ok(())
    }
}
