//! Shared types, errors, and configuration for Escala.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management (remote API, report geometry, storage)

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    ApiConfig, AppConfig, Locale, PageGeometry, PairingPolicy, ReportConfig, ServerConfig,
    StorageConfig, StorageProvider,
};
pub use error::{AppError, AppResult};
