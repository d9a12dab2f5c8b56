use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the photo-dedup library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration or invalid remediation request
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An extraction exceeded its whole-operation deadline
    #[error("Extraction timed out: {0}")]
    ExtractionTimeout(PathBuf),
}
