//! HTTP client for the remote schedule API.
//!
//! This crate provides:
//! - [`ApiClient`], a [`ScheduleSource`] backed by `reqwest`
//! - Wire types accepting both the backend's Portuguese field names and
//!   their English equivalents

pub mod client;
mod dto;

pub use client::ApiClient;
pub use escala_core::export::ScheduleSource;
