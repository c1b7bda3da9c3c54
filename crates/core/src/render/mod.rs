//! Serialization of composed reports.
//!
//! The renderer consumes a finished [`crate::reports::ReportDocument`] and
//! never changes its pagination.

pub mod error;
pub mod pdf;
pub mod text;

pub use error::RenderError;
pub use pdf::{PDF_CONTENT_TYPE, PdfRenderer, RenderedReport};
