//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote schedule API configuration.
    pub api: ApiConfig,
    /// Report layout configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Object storage for exported reports (optional).
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Remote schedule API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the schedule backend, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Assignments requested per listing page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    1000
}

/// Language used for every label printed in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Brazilian Portuguese.
    PtBr,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Self::En),
            "pt-br" | "pt_br" | "pt" => Ok(Self::PtBr),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// How summary matrix groups share pages in paginated mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Two groups per page, regardless of their height.
    #[default]
    Always,
    /// A second group shares the page only when both fit vertically.
    WhenFits,
}

/// Report layout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Physical page geometry.
    #[serde(default)]
    pub geometry: PageGeometry,
    /// Label language.
    #[serde(default)]
    pub locale: Locale,
    /// Summary page pairing policy.
    #[serde(default)]
    pub pairing: PairingPolicy,
}

/// Page geometry in millimetres (landscape).
///
/// `content_width_mm` and `min_column_width_mm` drive the layout planner;
/// the rest only matters to the renderer and the vertical-fit check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width.
    pub page_width_mm: f32,
    /// Page height.
    pub page_height_mm: f32,
    /// Margin on every side.
    pub margin_mm: f32,
    /// Width of the fixed date column.
    pub date_column_mm: f32,
    /// Width of the fixed weekday column.
    pub weekday_column_mm: f32,
    /// Width available to church columns in one matrix.
    pub content_width_mm: f32,
    /// Narrowest legible church column.
    pub min_column_width_mm: f32,
    /// Table row height.
    pub row_height_mm: f32,
    /// Height reserved for the title block at the top of every page.
    pub title_block_mm: f32,
    /// Height reserved for the footer line.
    pub footer_mm: f32,
    /// Vertical gap between two matrices on the same page.
    pub group_gap_mm: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            margin_mm: 10.0,
            date_column_mm: 18.0,
            weekday_column_mm: 12.0,
            content_width_mm: 247.0,
            min_column_width_mm: 25.0,
            row_height_mm: 6.0,
            title_block_mm: 22.0,
            footer_mm: 8.0,
            group_gap_mm: 8.0,
        }
    }
}

impl PageGeometry {
    /// Combined width of the date and weekday columns.
    #[must_use]
    pub fn fixed_columns_mm(&self) -> f32 {
        self.date_column_mm + self.weekday_column_mm
    }

    /// Height left for tables once margins, title block and footer are taken.
    #[must_use]
    pub fn table_area_height_mm(&self) -> f32 {
        self.page_height_mm - 2.0 * self.margin_mm - self.title_block_mm - self.footer_mm
    }
}

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short provider name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Where exported reports are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    pub provider: StorageProvider,
    /// Key prefix for every stored report.
    #[serde(default = "default_storage_prefix")]
    pub prefix: String,
    /// Presigned download URL TTL in seconds.
    #[serde(default = "default_download_ttl_secs")]
    pub presign_download_ttl_secs: u64,
}

impl StorageConfig {
    /// Creates a configuration with the default prefix and TTL.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            prefix: default_storage_prefix(),
            presign_download_ttl_secs: default_download_ttl_secs(),
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

fn default_storage_prefix() -> String {
    "reports".to_string()
}

fn default_download_ttl_secs() -> u64 {
    3600
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ESCALA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
