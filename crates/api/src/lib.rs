//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Report download and storage routes
//! - Health check
//! - Mapping of application errors to JSON responses

pub mod error;
pub mod routes;

use axum::Router;
use escala_core::export::ExportService;
use escala_core::storage::StorageService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Export pipeline bound to the schedule source.
    pub export: Arc<ExportService>,
    /// Storage service for exported reports (optional).
    pub storage: Option<Arc<StorageService>>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
