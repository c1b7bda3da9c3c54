//! Report storage errors.

use thiserror::Error;

/// Errors raised while storing or locating exported reports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No stored report under this key.
    #[error("no stored report at {key}")]
    NotFound {
        /// Key that was looked up.
        key: String,
    },

    /// The provider cannot hand out download links.
    #[error("storage provider cannot presign report downloads")]
    PresignNotSupported,

    /// The configured provider could not be set up.
    #[error("report storage is misconfigured: {0}")]
    Configuration(String),

    /// A read or write against the provider failed.
    #[error("report storage operation failed: {0}")]
    Operation(String),

    /// District or file name left nothing usable after sanitizing.
    #[error("cannot build a report key from {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(err.to_string()),
            opendal::ErrorKind::Unsupported => Self::PresignNotSupported,
            _ => Self::Operation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_reports() {
        assert_eq!(
            StorageError::not_found("reports/d/a.pdf").to_string(),
            "no stored report at reports/d/a.pdf"
        );
        assert_eq!(
            StorageError::InvalidKey(" / ".into()).to_string(),
            "cannot build a report key from \" / \""
        );
    }

    #[test]
    fn test_opendal_not_found_maps_to_not_found() {
        let err: StorageError =
            opendal::Error::new(opendal::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
