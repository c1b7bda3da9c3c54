//! Export error types.

use escala_shared::AppError;
use escala_shared::types::ScheduleId;
use thiserror::Error;

use crate::render::RenderError;
use crate::reports::ReportError;
use crate::storage::StorageError;

/// Errors raised while loading schedule data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The schedule does not exist upstream.
    #[error("Schedule {0} not found")]
    NotFound(ScheduleId),

    /// The request never produced a response.
    #[error("Schedule API unreachable: {0}")]
    Transport(String),

    /// The upstream answered with an unexpected status.
    #[error("Schedule API returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid schedule API response: {0}")]
    Decode(String),
}

impl SourceError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Errors raised by an export run. Nothing is written when one occurs.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Loading the schedule failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Composing the report failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Serializing the report failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing the report failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        let message = err.to_string();
        match err {
            ExportError::Source(SourceError::NotFound(_)) => Self::NotFound(message),
            ExportError::Source(_) => Self::ExternalService(message),
            ExportError::Report(ReportError::NoData(_)) => Self::NothingToExport(message),
            ExportError::Report(ReportError::InvalidMonth(_)) => Self::Validation(message),
            ExportError::Report(ReportError::InvalidGeometry(_)) => Self::Configuration(message),
            ExportError::Render(_) => Self::Internal(message),
            ExportError::Storage(_) => Self::Storage(message),
        }
    }
}
