use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input is neither a file nor a directory: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to render image: {0}")]
    RenderError(String),

    #[error("Failed to encode PNG image: {0}")]
    EncodeError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Output conflict: {0}")]
    OutputConflict(String),

    #[error("No input specified: pass -f/--file or configure a default input path")]
    NoInput,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
