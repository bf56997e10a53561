//! Minimal uncompressed 16-bit RGB TIFF.
//!
//! Layout (little endian):
//!
//! ```text
//! 0    header      "II" 42 ifd=8
//! 8    IFD         count, 12 or 13 entries, next=0
//!      extra       BitsPerSample [16,16,16], XRes 300/1, YRes 300/1,
//!                  description (NUL-terminated, padded to even length)
//!      strip       width*height*3 u16 samples
//! ```

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::encode::convert;
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::encode::writer::ImageWriter;
use crate::image_pipeline::render::RenderedFrame;

const HEADER_SIZE: usize = 8;
const ENTRY_SIZE: usize = 12;
/// BitsPerSample (6) + two rationals (16)
const EXTRA_FIXED_SIZE: usize = 22;
const DPI: u32 = 300;

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

mod tag {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC: u16 = 262;
    pub const IMAGE_DESCRIPTION: u16 = 270;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const X_RESOLUTION: u16 = 282;
    pub const Y_RESOLUTION: u16 = 283;
    pub const RESOLUTION_UNIT: u16 = 296;
}

struct IfdWriter {
    bytes: Vec<u8>,
}

impl IfdWriter {
    fn u16(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn entry(&mut self, tag: u16, kind: u16, count: u32, value: u32) {
        self.u16(tag);
        self.u16(kind);
        self.u32(count);
        // SHORT values sit in the low bytes of the field
        self.u32(value);
    }

    fn entry_inline_bytes(&mut self, tag: u16, kind: u16, value: &[u8]) {
        self.u16(tag);
        self.u16(kind);
        self.u32(value.len() as u32);
        let mut field = [0u8; 4];
        field[..value.len()].copy_from_slice(value);
        self.bytes.extend_from_slice(&field);
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| PipelineError::EncodeError(format!("{} {} exceeds TIFF limits", what, value)))
}

/// Encodes interleaved top-down RGB16 samples into a single-strip TIFF.
pub fn encode_rgb16(
    width: usize,
    height: usize,
    samples: &[u16],
    description: Option<&str>,
) -> Result<Vec<u8>> {
    let expected = width * height * 3;
    if width == 0 || height == 0 || samples.is_empty() {
        return Err(PipelineError::EmptyExport);
    }
    if samples.len() != expected {
        return Err(PipelineError::InvalidBuffer(format!(
            "expected {} samples, got {}",
            expected,
            samples.len()
        )));
    }

    let desc_bytes: Option<Vec<u8>> = description.filter(|d| !d.is_empty()).map(|d| {
        let mut bytes = d.as_bytes().to_vec();
        bytes.push(0);
        bytes
    });
    // ASCII values of four bytes or less live in the entry itself.
    let desc_out_of_line = desc_bytes.as_ref().is_some_and(|b| b.len() > 4);
    let desc_block = match &desc_bytes {
        Some(b) if desc_out_of_line => b.len() + b.len() % 2,
        _ => 0,
    };

    let entry_count: u16 = if desc_bytes.is_some() { 13 } else { 12 };
    let ifd_size = 2 + entry_count as usize * ENTRY_SIZE + 4;
    let extra_offset = HEADER_SIZE + ifd_size;
    let bits_offset = to_u32(extra_offset, "offset")?;
    let x_res_offset = bits_offset + 6;
    let y_res_offset = bits_offset + 14;
    let desc_offset = bits_offset + 22;
    let pixel_offset = extra_offset + EXTRA_FIXED_SIZE + desc_block;
    let pixel_bytes = expected * 2;

    let w = to_u32(width, "width")?;
    let h = to_u32(height, "height")?;
    let strip_bytes = to_u32(pixel_bytes, "strip size")?;
    let strip_offset = to_u32(pixel_offset, "strip offset")?;
    to_u32(pixel_offset + pixel_bytes, "file size")?;

    let mut out = IfdWriter {
        bytes: Vec::with_capacity(pixel_offset + pixel_bytes),
    };

    out.bytes.extend_from_slice(b"II");
    out.u16(42);
    out.u32(HEADER_SIZE as u32);

    out.u16(entry_count);
    out.entry(tag::IMAGE_WIDTH, TYPE_LONG, 1, w);
    out.entry(tag::IMAGE_LENGTH, TYPE_LONG, 1, h);
    out.entry(tag::BITS_PER_SAMPLE, TYPE_SHORT, 3, bits_offset);
    out.entry(tag::COMPRESSION, TYPE_SHORT, 1, 1);
    out.entry(tag::PHOTOMETRIC, TYPE_SHORT, 1, 2);
    if let Some(bytes) = &desc_bytes {
        if desc_out_of_line {
            out.entry(tag::IMAGE_DESCRIPTION, TYPE_ASCII, bytes.len() as u32, desc_offset);
        } else {
            out.entry_inline_bytes(tag::IMAGE_DESCRIPTION, TYPE_ASCII, bytes);
        }
    }
    out.entry(tag::STRIP_OFFSETS, TYPE_LONG, 1, strip_offset);
    out.entry(tag::SAMPLES_PER_PIXEL, TYPE_SHORT, 1, 3);
    out.entry(tag::ROWS_PER_STRIP, TYPE_LONG, 1, h);
    out.entry(tag::STRIP_BYTE_COUNTS, TYPE_LONG, 1, strip_bytes);
    out.entry(tag::X_RESOLUTION, TYPE_RATIONAL, 1, x_res_offset);
    out.entry(tag::Y_RESOLUTION, TYPE_RATIONAL, 1, y_res_offset);
    // Inch
    out.entry(tag::RESOLUTION_UNIT, TYPE_SHORT, 1, 2);
    out.u32(0);

    for _ in 0..3 {
        out.u16(16);
    }
    out.u32(DPI);
    out.u32(1);
    out.u32(DPI);
    out.u32(1);

    if let Some(bytes) = desc_bytes.as_ref().filter(|_| desc_out_of_line) {
        out.bytes.extend_from_slice(bytes);
        if bytes.len() % 2 != 0 {
            out.bytes.push(0);
        }
    }

    debug_assert_eq!(out.bytes.len(), pixel_offset);
    for s in samples {
        out.u16(*s);
    }

    Ok(out.bytes)
}

/// Writes the byte-exact uncompressed container.
pub struct StripTiffWriter;

impl ImageWriter for StripTiffWriter {
    fn write_frame(
        &self,
        frame: &RenderedFrame,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        debug!("Encoding strip TIFF: {}x{}", frame.width, frame.height);
        let samples = convert::to_rgb16(frame)?;
        let bytes = encode_rgb16(
            frame.width,
            frame.height,
            &samples,
            config.description.as_deref(),
        )?;
        output
            .write_all(&bytes)
            .map_err(|e| PipelineError::OutputWriteError(e.to_string()))?;
        debug!(bytes = bytes.len(), "Strip TIFF encoding complete");
        Ok(())
    }
}
