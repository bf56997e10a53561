//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline.

pub mod buffer;
pub mod color_math;
pub mod error;

pub use buffer::PixelBuffer;
pub use color_math::Matrix3;
pub use error::{ErrorKind, PipelineError, Result};
