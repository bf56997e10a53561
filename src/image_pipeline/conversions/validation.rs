//! Pre-decode checks on input files.

use std::path::Path;

use tracing::warn;

use crate::image_pipeline::common::error::{PipelineError, Result};

pub const MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

pub const SUPPORTED_EXTENSIONS: [&str; 8] = ["ARW", "CR2", "CR3", "DNG", "NEF", "ORF", "RAF", "RW2"];

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Checks a file's size and extension before it is read.
pub fn validate_file(path: &Path, size: u64) -> Result<()> {
    if size > MAX_FILE_SIZE {
        warn!(path = %path.display(), size, "Input exceeds size limit");
        return Err(PipelineError::InvalidInputFile(format!(
            "{} exceeds size limit of 200MB",
            path.display()
        )));
    }
    if !has_supported_extension(path) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_uppercase();
        return Err(PipelineError::InvalidInputFile(format!(
            "file type .{} is not supported",
            ext
        )));
    }
    Ok(())
}

/// [`validate_file`] using the size on disk.
pub fn validate_input_path(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
    validate_file(path, metadata.len())
}
