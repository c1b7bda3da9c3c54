//! Core report engine for Escala.
//!
//! This crate contains the report pipeline with ZERO web framework
//! dependencies. Schedule data comes in through [`export::ScheduleSource`];
//! everything between loading and writing is pure.
//!
//! # Modules
//!
//! - `schedule` - Schedules, assignments and their references
//! - `reports` - Aggregation, layout planning and page composition
//! - `render` - PDF serialization
//! - `storage` - Object storage for exported reports
//! - `export` - Load, compose, render and store in one call

pub mod export;
pub mod render;
pub mod reports;
pub mod schedule;
pub mod storage;
