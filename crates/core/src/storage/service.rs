//! Storage service implementation using Apache OpenDAL.

use std::time::Duration;

use chrono::{DateTime, Utc};
use escala_shared::{StorageConfig, StorageProvider};
use opendal::{ErrorKind, Operator, services};
use tracing::{debug, info, warn};

use super::error::StorageError;
use crate::render::RenderedReport;

/// Presigned URL for download.
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method to use.
    pub method: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// A report written to storage.
#[derive(Debug, Clone)]
pub struct StoredReport {
    /// Storage key.
    pub storage_key: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Download link, when the provider can presign reads.
    pub download: Option<PresignedUrl>,
}

/// Object storage sink for rendered reports.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Generate the storage key of a report.
    ///
    /// Format: `{prefix}/{district}/{sanitized_filename}`
    ///
    /// # Errors
    ///
    /// Returns an error if the district or file name sanitizes to nothing.
    pub fn report_key(&self, district: &str, filename: &str) -> Result<String, StorageError> {
        let district = sanitize_segment(district);
        let filename = sanitize_segment(filename);
        if district.is_empty() || filename.is_empty() {
            return Err(StorageError::InvalidKey(format!("{district}/{filename}")));
        }

        let prefix = self.config.prefix.trim_matches('/');
        if prefix.is_empty() {
            Ok(format!("{district}/{filename}"))
        } else {
            Ok(format!("{prefix}/{district}/{filename}"))
        }
    }

    /// Write a rendered report and try to presign a download link.
    ///
    /// Overwrites any earlier export of the same month for the same district.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails. Presigning
    /// happens after the write and never fails the call.
    pub async fn store(
        &self,
        district: &str,
        report: &RenderedReport,
    ) -> Result<StoredReport, StorageError> {
        let key = self.report_key(district, &report.filename)?;

        if self
            .operator
            .info()
            .full_capability()
            .write_with_content_type
        {
            self.operator
                .write_with(&key, report.bytes.clone())
                .content_type(report.content_type)
                .await?;
        } else {
            self.operator.write(&key, report.bytes.clone()).await?;
        }

        let size = self.stat(&key).await?;
        info!(
            storage_key = %key,
            provider = self.provider_name(),
            size,
            "Report stored"
        );

        let download = download_link(&key, self.presign_download(&key).await);

        Ok(StoredReport {
            storage_key: key,
            size,
            download,
        })
    }

    /// Generate presigned URL for download.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning is not supported or fails.
    pub async fn presign_download(&self, key: &str) -> Result<PresignedUrl, StorageError> {
        if !self.operator.info().full_capability().presign_read {
            debug!(provider = self.provider_name(), "Provider cannot presign reads");
            return Err(StorageError::PresignNotSupported);
        }

        let ttl = Duration::from_secs(self.config.presign_download_ttl_secs);
        let presigned = self.operator.presign_read(key, ttl).await?;

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(
                    i64::try_from(self.config.presign_download_ttl_secs).unwrap_or(i64::MAX),
                ),
        })
    }

    /// Size in bytes of a stored object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be accessed.
    pub async fn stat(&self, key: &str) -> Result<u64, StorageError> {
        match self.operator.stat(key).await {
            Ok(meta) => Ok(meta.content_length()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a report exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

/// Keeps a presigned link if there is one. The report is already written.
fn download_link(
    key: &str,
    presigned: Result<PresignedUrl, StorageError>,
) -> Option<PresignedUrl> {
    match presigned {
        Ok(url) => Some(url),
        Err(StorageError::PresignNotSupported) => None,
        Err(e) => {
            warn!(storage_key = %key, error = %e, "Report stored without a download link");
            None
        }
    }
}

/// Sanitize one storage key segment.
///
/// Accented Latin letters fold to their ASCII base so month names keep
/// reading as words. Otherwise only ASCII alphanumeric characters, dots,
/// hyphens, and underscores survive. Leading dots are dropped so a segment
/// can never climb out of its prefix.
fn sanitize_segment(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .map(|c| match fold_accent(c) {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// ASCII base letter of a Portuguese or Spanish accented letter.
const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}
