use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::encode::raster_writer::RasterWriter;
use crate::image_pipeline::encode::standard_tiff_writer::StandardTiffWriter;
use crate::image_pipeline::encode::strip_tiff_writer::StripTiffWriter;
use crate::image_pipeline::encode::types::{ExportConfig, ExportFormat, TiffCompression};
use crate::image_pipeline::encode::writer::ImageWriter;
use crate::image_pipeline::render::RenderedFrame;

/// Picks a concrete writer from the export config.
///
/// Uncompressed TIFF uses the byte-exact strip writer, compressed TIFF the
/// `tiff` crate, and everything else the raster backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatWriter;

impl ImageWriter for FormatWriter {
    fn write_frame(
        &self,
        frame: &RenderedFrame,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        match (config.format, config.compression) {
            (ExportFormat::Tiff16, TiffCompression::None) => {
                debug!("Dispatching to strip TIFF writer");
                StripTiffWriter.write_frame(frame, output, config)
            }
            (ExportFormat::Tiff16, _) => {
                debug!("Dispatching to compressed TIFF writer");
                StandardTiffWriter.write_frame(frame, output, config)
            }
            _ => RasterWriter.write_frame(frame, output, config),
        }
    }
}

/// Encodes `frame` into an in-memory file.
pub fn encode_frame(frame: &RenderedFrame, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    FormatWriter.write_frame(frame, &mut bytes, config)?;
    Ok(bytes)
}
