//! Report error types.

use escala_shared::types::ScheduleId;
use thiserror::Error;

/// Errors that can occur during report composition.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The schedule has no assignment that can be placed in a report.
    #[error("Nothing to export for schedule {0}")]
    NoData(ScheduleId),

    /// Page geometry cannot hold a single church column.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Reference month outside 1-12.
    #[error("Invalid reference month: {0}")]
    InvalidMonth(u32),
}

impl ReportError {
    /// Create an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }
}
