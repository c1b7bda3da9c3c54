//! Storage of exported reports using Apache OpenDAL.
//!
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Reports are stored under `{prefix}/{district}/{filename}`.

mod error;
mod service;

pub use error::StorageError;
pub use service::{PresignedUrl, StorageService, StoredReport};
