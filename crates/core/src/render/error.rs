//! Render error types.

use thiserror::Error;

/// Errors that can occur while serializing a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF object model rejected the content.
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the serialized document failed.
    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}
