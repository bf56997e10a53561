use std::io::Write;

use tiff::encoder::colortype::RGB16;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::{Predictor, Tag};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::encode::convert;
use crate::image_pipeline::encode::types::{ExportConfig, TiffCompression};
use crate::image_pipeline::encode::writer::ImageWriter;
use crate::image_pipeline::render::RenderedFrame;

fn encode_error<E: std::fmt::Display>(e: E) -> PipelineError {
    PipelineError::EncodeError(e.to_string())
}

/// Compressed 16-bit RGB TIFF through the `tiff` crate.
pub struct StandardTiffWriter;

impl ImageWriter for StandardTiffWriter {
    fn write_frame(
        &self,
        frame: &RenderedFrame,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", frame.width, frame.height);

        let samples = convert::to_rgb16(frame)?;
        let mut buffer: Vec<u8> = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let mut image = encoder
            .new_image::<RGB16>(frame.width as u32, frame.height as u32)
            .map_err(encode_error)?;
        if let Some(description) = config.description.as_deref().filter(|d| !d.is_empty()) {
            image
                .encoder()
                .write_tag(Tag::ImageDescription, description)
                .map_err(encode_error)?;
        }
        image.write_data(&samples).map_err(encode_error)?;

        output
            .write_all(&buffer)
            .map_err(|e| PipelineError::OutputWriteError(e.to_string()))?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
