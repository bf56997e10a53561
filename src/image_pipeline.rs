//! Image processing pipeline module
//!
//! RAW decoding, demosaic, metering, the color pipeline and export, with
//! separate modules per stage and `conversions` orchestrating them.

pub mod color;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod encode;
pub mod lut;
pub mod metering;
pub mod raw;
pub mod render;

pub use common::{ErrorKind, Matrix3, PipelineError, PixelBuffer, Result};

pub use color::{LogCurve, TargetGamut};

pub use metering::{MeteringMode, WorkingSpace, calculate_auto_exposure, calculate_auto_exposure_in};

pub use lut::{Lut3D, load_cube_file, parse_cube};

pub use render::{ColorPipeline, FrameStatistics, RenderSettings, RenderedFrame, ToneParameters};

pub use encode::{ExportConfig, ExportFormat, FormatWriter, ImageWriter, TiffCompression, encode_frame};

pub use raw::{RawImageData, RawImageReader, RawLoaderReader};

pub use conversions::{DevelopConfig, DevelopConfigBuilder, DevelopPipeline, DevelopReport, export_path};
