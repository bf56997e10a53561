//! Export module
//!
//! Serialises rendered frames: a byte-exact uncompressed 16-bit TIFF,
//! compressed TIFF via the `tiff` crate, and 8-bit raster formats.

pub mod convert;
mod format_writer;
mod raster_writer;
mod standard_tiff_writer;
pub mod strip_tiff_writer;
pub mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use format_writer::{FormatWriter, encode_frame};
pub use raster_writer::RasterWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use strip_tiff_writer::StripTiffWriter;
pub use types::{ExportConfig, ExportConfigBuilder, ExportFormat, TiffCompression};
pub use writer::ImageWriter;
