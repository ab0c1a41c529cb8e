//! Error types for template processing.

use thiserror::Error;

/// Errors that can occur while processing a document template.
///
/// `UnknownPlaceholder`, `UnknownBlock` and `ImageDecode` are contained by
/// the orchestrator (logged, section skipped); the rest abort the render.
#[derive(Error, Debug)]
pub enum DocxError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Required package part is missing
    #[error("missing package part: {0}")]
    MissingPart(String),

    /// Package part is not valid UTF-8
    #[error("package part '{part}' is not valid UTF-8")]
    InvalidPart { part: String },

    /// Placeholder name not present in the document
    #[error("unknown placeholder: ${{{0}}}")]
    UnknownPlaceholder(String),

    /// Block or row marker not present in the document
    #[error("unknown block: ${{{0}}}")]
    UnknownBlock(String),

    /// Image bytes could not be decoded
    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Image format is decodable but not embeddable
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),
}

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, DocxError>;
