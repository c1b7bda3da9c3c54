//! Schedule report composition.
//!
//! This module turns the assignments of one schedule into a paginated
//! [`ReportDocument`]:
//! - Aggregation of dates and churches
//! - Layout planning (single matrix or paired column groups)
//! - Summary matrices and per-church detail pages
//! - Page footers
//!
//! Everything here is pure. Fetching and rendering live in other modules.

pub mod aggregator;
pub mod detail;
pub mod error;
pub mod footer;
pub mod labels;
pub mod layout;
pub mod matrix;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregator::{Aggregation, Aggregator};
pub use error::ReportError;
pub use labels::{Labels, PLACEHOLDER};
pub use layout::{LayoutMode, LayoutPlan, LayoutPlanner, MatrixGroup};
pub use service::ReportService;
pub use types::*;
