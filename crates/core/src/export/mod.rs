//! Export pipeline: load, compose, render, and optionally store.
//!
//! I/O happens only at the two ends. Composition in between is the pure
//! [`crate::reports::ReportService::compose`].

pub mod error;
pub mod service;
pub mod source;

pub use error::{ExportError, SourceError};
pub use service::{ExportService, ExportedReport, StoredExport};
pub use source::{ScheduleSource, StaticSource};
