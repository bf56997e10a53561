use thiserror::Error;

/// Broad class of a [`PipelineError`], used by callers to decide whether a
/// fallback (e.g. another export format) is worth attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller-supplied data. Fatal to the single operation.
    Input,
    /// A required backend is not compiled in or not usable.
    Capability,
    /// The request names something this build does not know about.
    Configuration,
    /// Reading or writing bytes failed.
    Io,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid input file: {0}")]
    InvalidInputFile(String),

    #[error("Invalid LUT: {0}")]
    InvalidLut(String),

    #[error("LUT_3D_SIZE not found or invalid")]
    MissingLutSize,

    #[error("Insufficient LUT data: expected {expected} values, got {got}")]
    InsufficientLutData { expected: usize, got: usize },

    #[error("No data received for export")]
    EmptyExport,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InputReadError(_)
            | PipelineError::OutputWriteError(_)
            | PipelineError::IoError(_) => ErrorKind::Io,
            PipelineError::UnsupportedFormat(_) => ErrorKind::Configuration,
            PipelineError::BackendUnavailable(_) => ErrorKind::Capability,
            PipelineError::DecodeError(_)
            | PipelineError::EncodeError(_)
            | PipelineError::InvalidDimensions(_, _)
            | PipelineError::InvalidBuffer(_)
            | PipelineError::InvalidInputFile(_)
            | PipelineError::InvalidLut(_)
            | PipelineError::MissingLutSize
            | PipelineError::InsufficientLutData { .. }
            | PipelineError::EmptyExport => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
