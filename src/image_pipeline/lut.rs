//! 3D LUT loading and sampling
//!
//! Parses Adobe/Resolve-style `.cube` text and applies the resulting grid
//! with trilinear interpolation.

mod parser;
mod sampler;
pub mod types;


pub use parser::{load_cube_file, parse_cube};
pub use types::Lut3D;
