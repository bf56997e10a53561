//! Develop orchestration
//!
//! Wires the RAW reader, demosaic, metering, color pipeline and export writer
//! together, for single files and parallel batches.

mod develop;
pub mod timing;
pub mod types;
pub mod validation;


pub use develop::{DevelopPipeline, export_path};
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{DevelopConfig, DevelopConfigBuilder, DevelopReport};
pub use validation::{MAX_FILE_SIZE, SUPPORTED_EXTENSIONS, validate_file, validate_input_path};
