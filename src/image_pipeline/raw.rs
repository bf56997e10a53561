//! RAW decoding adapter
//!
//! Turns camera RAW bytes into black-subtracted 16-bit samples plus the
//! metadata the color pipeline consumes (camera matrix, white balance).

mod rawloader_reader;
mod reader;
pub mod types;

pub use rawloader_reader::RawLoaderReader;
pub use reader::RawImageReader;
pub use types::RawImageData;
