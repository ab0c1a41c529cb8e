//! Engine error types.

use thiserror::Error;

/// Fatal render errors.
///
/// Per-section failures never surface here; they are logged and collected
/// by the orchestrator. Only template open/save problems and filesystem
/// errors abort a render.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The template package could not be opened or saved.
    #[error("template error: {0}")]
    Template(#[from] rf_docx::DocxError),

    /// I/O error outside the template package.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
